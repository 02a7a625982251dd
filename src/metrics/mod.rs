//! Operational counters for lifokit stacks (feature `metrics`).
//!
//! Recording lives in [`metrics_impl::LifoMetrics`], read-side snapshots in
//! [`snapshot::LifoMetricsSnapshot`], and publishing in
//! [`exporter::PrometheusTextExporter`].

pub mod cell;
pub mod exporter;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;
