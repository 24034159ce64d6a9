// Prometheus Metrics for the Broker Gateway
// Tracks: dispatch outcomes per action, dispatch latency, broker connection

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec_with_registry, register_histogram_vec_with_registry,
    register_int_gauge_with_registry, CounterVec, Encoder, HistogramOpts, HistogramVec, IntGauge, Opts,
    Registry, TextEncoder,
};
use std::sync::Arc;

pub struct Metrics {
    pub registry: Registry,

    // Dispatch metrics
    pub dispatch_total: CounterVec,
    pub dispatch_duration_seconds: HistogramVec,

    // Dependency metrics
    pub broker_connect_attempts: IntGauge,
    pub broker_connected: IntGauge,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let dispatch_total = register_counter_vec_with_registry!(
            Opts::new("gateway_dispatch_total", "Inbound requests by action and outcome"),
            &["action", "outcome"],
            registry
        )?;

        let dispatch_duration_seconds = register_histogram_vec_with_registry!(
            HistogramOpts::new(
                "gateway_dispatch_duration_seconds",
                "Backend call duration in seconds"
            )
            .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
            &["action"],
            registry
        )?;

        let broker_connect_attempts = register_int_gauge_with_registry!(
            Opts::new(
                "gateway_broker_connect_attempts",
                "Attempts made to connect the message broker at startup"
            ),
            registry
        )?;

        let broker_connected = register_int_gauge_with_registry!(
            Opts::new("gateway_broker_connected", "1 when the message broker is connected"),
            registry
        )?;

        Ok(Self {
            registry,
            dispatch_total,
            dispatch_duration_seconds,
            broker_connect_attempts,
            broker_connected,
        })
    }

    /// Export all metrics in Prometheus text format, including collectors
    /// registered in the default registry by the message bus
    pub fn export(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let mut metric_families = self.registry.gather();
        metric_families.extend(prometheus::gather());
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    pub fn track_dispatch(&self, action: &str, outcome: &str) {
        self.dispatch_total.with_label_values(&[action, outcome]).inc();
    }

    pub fn record_broker_connected(&self, connected: bool) {
        self.broker_connected.set(i64::from(connected));
    }
}

// Global metrics instance
pub static METRICS: Lazy<Arc<Metrics>> =
    Lazy::new(|| Arc::new(Metrics::new().expect("Failed to initialize metrics")));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_contains_dispatch_counter() {
        let metrics = Metrics::new().unwrap();
        metrics.track_dispatch("mail", "success");

        let text = metrics.export().unwrap();
        assert!(text.contains("gateway_dispatch_total{action=\"mail\",outcome=\"success\"} 1"));
    }

    #[test]
    fn test_export_includes_message_bus_metrics() {
        message_bus::metrics::MESSAGE_PUBLISH_TOTAL
            .with_label_values(&["log.INFO", "success"])
            .inc();

        let text = Metrics::new().unwrap().export().unwrap();
        assert!(text.contains("message_bus_publish_total{"));
        assert!(text.contains("gateway_broker_connected 0"));
    }

    #[test]
    fn test_broker_gauge_follows_connection() {
        let metrics = Metrics::new().unwrap();

        metrics.record_broker_connected(true);
        assert_eq!(metrics.broker_connected.get(), 1);

        metrics.record_broker_connected(false);
        assert_eq!(metrics.broker_connected.get(), 0);
    }
}
