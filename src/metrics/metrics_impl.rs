use crate::error::CancelError;
use crate::metrics::cell::MetricsCell;
use crate::metrics::snapshot::LifoMetricsSnapshot;
use crate::metrics::traits::{LifoMetricsRecorder, MetricsReset};

#[derive(Debug, Default)]
pub struct LifoMetrics {
    pub push_calls: MetricsCell,
    pub evictions: MetricsCell,
    pub pop_calls: MetricsCell,
    pub pop_hits: MetricsCell,
    pub pop_cancelled: MetricsCell,
    pub pop_deadline_exceeded: MetricsCell,
    pub try_pop_misses: MetricsCell,
    pub clears: MetricsCell,
}

impl LifoMetrics {
    /// Copies the counters; gauges are filled in by the owning stack.
    pub fn snapshot(
        &self,
        len: usize,
        available_permits: usize,
        capacity: usize,
    ) -> LifoMetricsSnapshot {
        LifoMetricsSnapshot {
            push_calls: self.push_calls.get(),
            evictions: self.evictions.get(),
            pop_calls: self.pop_calls.get(),
            pop_hits: self.pop_hits.get(),
            pop_cancelled: self.pop_cancelled.get(),
            pop_deadline_exceeded: self.pop_deadline_exceeded.get(),
            try_pop_misses: self.try_pop_misses.get(),
            clears: self.clears.get(),
            len,
            available_permits,
            capacity,
        }
    }
}

impl LifoMetricsRecorder for LifoMetrics {
    fn record_push(&self) {
        self.push_calls.incr();
    }
    fn record_eviction(&self) {
        self.evictions.incr();
    }
    fn record_pop_call(&self) {
        self.pop_calls.incr();
    }
    fn record_pop_hit(&self) {
        self.pop_hits.incr();
    }
    fn record_pop_cancelled(&self, reason: CancelError) {
        match reason {
            CancelError::Cancelled => self.pop_cancelled.incr(),
            CancelError::DeadlineExceeded => self.pop_deadline_exceeded.incr(),
        }
    }
    fn record_try_pop_miss(&self) {
        self.try_pop_misses.incr();
    }
    fn record_clear(&self) {
        self.clears.incr();
    }
}

impl MetricsReset for LifoMetrics {
    fn reset_metrics(&self) {
        for cell in [
            &self.push_calls,
            &self.evictions,
            &self.pop_calls,
            &self.pop_hits,
            &self.pop_cancelled,
            &self.pop_deadline_exceeded,
            &self.try_pop_misses,
            &self.clears,
        ] {
            cell.reset();
        }
    }
}
