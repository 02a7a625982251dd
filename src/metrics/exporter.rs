use std::io::Write;

use parking_lot::Mutex;

use crate::metrics::snapshot::LifoMetricsSnapshot;
use crate::metrics::traits::MetricsExporter;

/// Prometheus text exporter for stack metrics snapshots.
///
/// This exporter writes in the Prometheus text exposition format so it can be
/// scraped by Prometheus or forwarded to an OpenTelemetry collector.
#[derive(Debug)]
pub struct PrometheusTextExporter<W: Write + Send> {
    prefix: String,
    writer: Mutex<W>,
}

impl<W: Write + Send> PrometheusTextExporter<W> {
    pub fn new(prefix: impl Into<String>, writer: W) -> Self {
        Self {
            prefix: prefix.into(),
            writer: Mutex::new(writer),
        }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn write_metric(&self, kind: &str, name: &str, value: u64) {
        let mut writer = self.writer.lock();
        let _ = writeln!(writer, "# TYPE {} {}", name, kind);
        let _ = writeln!(writer, "{} {}", name, value);
    }

    fn write_counter(&self, name: &str, value: u64) {
        self.write_metric("counter", name, value);
    }

    fn write_gauge(&self, name: &str, value: u64) {
        self.write_metric("gauge", name, value);
    }

    fn metric_name(&self, suffix: &str) -> String {
        if self.prefix.is_empty() {
            suffix.to_string()
        } else {
            format!("{}_{}", self.prefix, suffix)
        }
    }
}

impl<W: Write + Send> MetricsExporter<LifoMetricsSnapshot> for PrometheusTextExporter<W> {
    fn export(&self, snapshot: &LifoMetricsSnapshot) {
        self.write_counter(&self.metric_name("push_calls_total"), snapshot.push_calls);
        self.write_counter(&self.metric_name("evictions_total"), snapshot.evictions);
        self.write_counter(&self.metric_name("pop_calls_total"), snapshot.pop_calls);
        self.write_counter(&self.metric_name("pop_hits_total"), snapshot.pop_hits);
        self.write_counter(&self.metric_name("pop_cancelled_total"), snapshot.pop_cancelled);
        self.write_counter(
            &self.metric_name("pop_deadline_exceeded_total"),
            snapshot.pop_deadline_exceeded,
        );
        self.write_counter(&self.metric_name("try_pop_misses_total"), snapshot.try_pop_misses);
        self.write_counter(&self.metric_name("clears_total"), snapshot.clears);

        self.write_gauge(&self.metric_name("len"), snapshot.len as u64);
        self.write_gauge(
            &self.metric_name("available_permits"),
            snapshot.available_permits as u64,
        );
        self.write_gauge(&self.metric_name("capacity"), snapshot.capacity as u64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exports_prefixed_counters_and_gauges() {
        let exporter = PrometheusTextExporter::new("jobs", Vec::new());
        exporter.export(&LifoMetricsSnapshot {
            push_calls: 7,
            evictions: 2,
            len: 5,
            capacity: 5,
            ..Default::default()
        });

        let text = String::from_utf8(exporter.into_inner()).unwrap();
        assert!(text.contains("# TYPE jobs_push_calls_total counter\njobs_push_calls_total 7\n"));
        assert!(text.contains("jobs_evictions_total 2\n"));
        assert!(text.contains("# TYPE jobs_len gauge\njobs_len 5\n"));
        assert!(text.contains("jobs_capacity 5\n"));
    }

    #[test]
    fn empty_prefix_uses_bare_names() {
        let exporter = PrometheusTextExporter::new("", Vec::new());
        exporter.export(&LifoMetricsSnapshot::default());

        let text = String::from_utf8(exporter.into_inner()).unwrap();
        assert!(text.contains("\npop_calls_total 0\n"));
    }
}
