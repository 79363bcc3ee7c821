mod traits;

use std::sync::Arc;

pub use traits::TelemetryMetrics;

#[derive(Clone)]
pub struct Telemetry<M: TelemetryMetrics> {
    metrics: Option<Arc<M>>,
}

impl<M: TelemetryMetrics> Telemetry<M> {
    pub fn new(metrics: Option<M>) -> Arc<Self> {
        Arc::new(Self {
            metrics: metrics.map(Arc::new),
        })
    }

    pub fn base_metrics(&self) -> Option<M> {
        self.metrics.clone().and_then(|m| m.metrics())
    }

    pub fn maybe_use_metrics<F>(&self, f: F)
    where
        F: Fn(&M),
    {
        if let Some(metrics) = &self.metrics {
            f(metrics);
        }
    }

    /// Service metrics followed by the default registry (process
    /// collector), terminated by `# EOF`.
    pub async fn get_metrics(&self) -> String {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();

        if self.metrics.is_none() {
            return "# EOF\n".to_string();
        }

        let mut result = String::new();
        if let Some(metrics) = &self.metrics {
            result.push_str(&metrics.gather_metrics());
        }

        let mut buffer = Vec::new();
        if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
            tracing::error!("could not encode prometheus metrics: {}", e);
        }

        let res_custom = match String::from_utf8(buffer) {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(
                    "prometheus metrics could not be from_utf8'd: {}",
                    e
                );
                String::default()
            }
        };

        result.push_str(&res_custom);
        result.push_str("# EOF\n");
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use prometheus::{IntCounter, Registry};

    #[derive(Clone)]
    struct TestMetrics {
        registry: Registry,
        hits: IntCounter,
    }

    impl TelemetryMetrics for TestMetrics {
        fn registry(&self) -> &Registry {
            &self.registry
        }
    }

    fn test_metrics() -> TestMetrics {
        let registry = Registry::new();
        let hits = IntCounter::new("test_hits", "hits").unwrap();
        registry.register(Box::new(hits.clone())).unwrap();
        TestMetrics { registry, hits }
    }

    #[tokio::test]
    async fn test_get_metrics_without_metrics_is_eof() {
        let telemetry = Telemetry::<TestMetrics>::new(None);
        assert_eq!(telemetry.get_metrics().await, "# EOF\n");
    }

    #[tokio::test]
    async fn test_get_metrics_renders_service_registry() {
        let telemetry = Telemetry::new(Some(test_metrics()));
        telemetry.maybe_use_metrics(|m| m.hits.inc_by(3));

        let rendered = telemetry.get_metrics().await;
        assert!(rendered.contains("test_hits 3"));
        assert!(rendered.ends_with("# EOF\n"));
    }
}
