/// Point-in-time copy of a stack's counters and gauges.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LifoMetricsSnapshot {
    pub push_calls: u64,
    pub evictions: u64,

    pub pop_calls: u64,
    pub pop_hits: u64,
    pub pop_cancelled: u64,
    pub pop_deadline_exceeded: u64,
    pub try_pop_misses: u64,

    pub clears: u64,

    // gauges captured at snapshot time
    pub len: usize,
    pub available_permits: usize,
    pub capacity: usize,
}

impl LifoMetricsSnapshot {
    /// Fraction of pushes that displaced an older element.
    pub fn eviction_ratio(&self) -> f64 {
        if self.push_calls == 0 {
            0.0
        } else {
            self.evictions as f64 / self.push_calls as f64
        }
    }
}
