use std::collections::HashMap;
use std::time::{Duration, Instant};

use axum::Json;
use axum::http::StatusCode;
use open_meteo_client::OpenMeteoClientResult;
use serde::Serialize;

use crate::AppState;

const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(3);
const PROBE_CITY: &str = "Berlin";
const PROBE_COORDINATES: (f64, f64) = (52.52, 13.41);

#[derive(Serialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Serialize)]
pub struct ComponentHealth {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub components: HashMap<String, ComponentHealth>,
}

/// Upstream outages degrade the service (history still works) but only a
/// pending shutdown makes it unhealthy.
pub async fn handler(state: AppState) -> (StatusCode, Json<HealthResponse>) {
    let mut components = HashMap::new();

    // Run all probes concurrently
    let client = &state.weather_client;
    let (geocoding, forecast) = tokio::join!(
        check_upstream(client.geocode(PROBE_CITY, 1)),
        check_upstream(
            client.forecast(PROBE_COORDINATES.0, PROBE_COORDINATES.1)
        ),
    );

    components.insert("geocoding".to_string(), geocoding);
    components.insert("forecast".to_string(), forecast);

    let any_unhealthy = components
        .values()
        .any(|c| c.status == HealthStatus::Unhealthy);

    let overall = if state.shutdown.is_shutting_down() {
        HealthStatus::Unhealthy
    } else if any_unhealthy {
        HealthStatus::Degraded
    } else {
        HealthStatus::Healthy
    };

    let status_code = if overall == HealthStatus::Unhealthy {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    (
        status_code,
        Json(HealthResponse {
            status: overall,
            components,
        }),
    )
}

async fn check_upstream<T>(
    probe: impl Future<Output = OpenMeteoClientResult<T>>,
) -> ComponentHealth {
    let start = Instant::now();
    let result = tokio::time::timeout(UPSTREAM_TIMEOUT, probe).await;

    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(Ok(_)) => ComponentHealth {
            status: HealthStatus::Healthy,
            latency_ms: Some(latency_ms),
            error: None,
        },
        Ok(Err(e)) => ComponentHealth {
            status: HealthStatus::Unhealthy,
            latency_ms: Some(latency_ms),
            error: Some(e.to_string()),
        },
        Err(_) => ComponentHealth {
            status: HealthStatus::Unhealthy,
            latency_ms: Some(latency_ms),
            error: Some("timeout".to_string()),
        },
    }
}
