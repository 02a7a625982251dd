//! lifokit: a bounded, concurrency-safe LIFO for most-recent-first pipelines.
//!
//! Producers [`push`](BoundedLifo::push) without ever blocking; when the stack
//! is full the oldest resident element is shed. Consumers
//! [`pop`](BoundedLifo::pop) the newest element, blocking until one exists or
//! their [`CancelToken`] fires.
//!
//! See `DESIGN.md` for internal architecture and invariants.

pub mod builder;
pub mod cancel;
pub mod ds;
pub mod error;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;
pub mod stack;
pub mod traits;

pub use crate::cancel::CancelToken;
pub use crate::ds::{PermitGate, RecencyStack};
pub use crate::error::CancelError;
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::LifoMetricsSnapshot;
#[cfg(feature = "async")]
pub use crate::stack::AsyncBoundedLifo;
pub use crate::stack::BoundedLifo;
