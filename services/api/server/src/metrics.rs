use prometheus::{IntCounter, IntCounterVec, Opts, Registry};
use telemetry::metrics::TelemetryMetrics;

#[derive(Clone, Debug)]
pub struct ServerMetrics {
    pub registry: Registry,

    pub request_errors: IntCounterVec,
    pub upstream_failures: IntCounterVec,
    pub history_decode_failures: IntCounter,
}

impl TelemetryMetrics for ServerMetrics {
    fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl ServerMetrics {
    /// Counters are registered only in this instance's registry, so several
    /// instances can coexist in one process.
    pub fn new(prefix: Option<String>) -> anyhow::Result<Self> {
        let request_errors = IntCounterVec::new(
            Opts::new(
                "request_errors",
                "A metric counting request errors by handler and error code",
            ),
            &["handler", "error_code"],
        )?;

        let upstream_failures = IntCounterVec::new(
            Opts::new(
                "upstream_failures",
                "A metric counting failed Open-Meteo calls by stage and error code",
            ),
            &["stage", "error_code"],
        )?;

        let history_decode_failures = IntCounter::new(
            "history_decode_failures",
            "A metric counting history cookies that could not be decoded",
        )?;

        let registry = Registry::new_custom(prefix, None)?;
        registry.register(Box::new(request_errors.clone()))?;
        registry.register(Box::new(upstream_failures.clone()))?;
        registry.register(Box::new(history_decode_failures.clone()))?;

        Ok(Self {
            registry,
            request_errors,
            upstream_failures,
            history_decode_failures,
        })
    }

    pub fn record_error(&self, handler: &str, error_code: &str) {
        self.request_errors
            .with_label_values(&[handler, error_code])
            .inc();
    }

    pub fn record_upstream_failure(&self, stage: &str, error_code: &str) {
        self.upstream_failures
            .with_label_values(&[stage, error_code])
            .inc();
    }

    pub fn record_history_decode_failure(&self) {
        self.history_decode_failures.inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instances_do_not_collide() {
        let first = ServerMetrics::new(None).unwrap();
        let second = ServerMetrics::new(Some("weather".to_string())).unwrap();

        first.record_error("weather_forecast", "city_not_found");
        second.record_upstream_failure("forecast", "upstream_error");
        second.record_history_decode_failure();

        assert_eq!(
            first
                .request_errors
                .with_label_values(&["weather_forecast", "city_not_found"])
                .get(),
            1
        );
        assert!(first.gather_metrics().contains("request_errors{"));

        let rendered = second.gather_metrics();
        assert!(rendered.contains("weather_history_decode_failures 1"));
        assert!(rendered.contains("weather_upstream_failures{"));
    }
}
