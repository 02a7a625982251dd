//! # Metrics Trait Hierarchy
//!
//! Recording, snapshotting, and export are separate responsibilities so the
//! stack's hot paths only ever bump counters.
//!
//! ```text
//!   ┌──────────────────────────┐
//!   │   LifoMetricsRecorder    │  push / evict / pop / cancel / clear
//!   └────────────┬─────────────┘
//!                │ (&self, atomic)
//!                ▼
//!   ┌──────────────────────────┐    ┌──────────────────────────┐
//!   │ MetricsSnapshotProvider  │    │ MetricsExporter<S>       │
//!   │ (bench/test)             │    │ (production monitoring)  │
//!   └──────────────────────────┘    └──────────────────────────┘
//! ```
//!
//! Recorders take `&self` because every stack operation does: a blocked pop
//! and a concurrent push must both be able to count without a shared lock.

use crate::error::CancelError;

/// Counters for any bounded LIFO.
pub trait LifoMetricsRecorder {
    fn record_push(&self);
    fn record_eviction(&self);
    fn record_pop_call(&self);
    fn record_pop_hit(&self);
    fn record_pop_cancelled(&self, reason: CancelError);
    fn record_try_pop_miss(&self);
    fn record_clear(&self);
}

/// Snapshot provider for bench/testing.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

/// Reset metrics between tests or benchmark iterations.
pub trait MetricsReset {
    fn reset_metrics(&self);
}

/// Export/publish metrics to production monitoring backends.
pub trait MetricsExporter<S> {
    fn export(&self, snapshot: &S);
}
