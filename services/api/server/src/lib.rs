//! # Weather API Server
//!
use crate::metrics::ServerMetrics;
use crate::shutdown::ShutdownCoordinator;
use anyhow::Context;
use open_meteo_client::{OpenMeteoClient, OpenMeteoConfig};
use std::sync::Arc;
use std::time::Duration;
use telemetry::metrics::Telemetry;
// Private API modules - internal implementation details
mod api;
pub mod shutdown;

// OpenAPI documentation module
pub mod openapi;

// Public modules - shared utilities and middleware
pub mod health;
pub mod metrics;
pub mod routes;
pub mod shared;

// Only the route registration function is exported from the API tree
pub use api::core::v1::get_routes as get_weather_api_v1_routes;

/// Returns the OpenAPI documentation route
pub fn get_openapi_routes() -> axum::Router {
    use axum::Json;
    use axum::routing::get;

    async fn openapi_handler() -> Json<serde_json::Value> {
        Json(openapi::WeatherApiDoc::openapi_json())
    }

    axum::Router::new().route("/api-docs/openapi.json", get(openapi_handler))
}

#[derive(Clone)]
pub struct AppState {
    pub telemetry: Arc<Telemetry<ServerMetrics>>,
    pub weather_client: OpenMeteoClient,
    pub config: Arc<Config>,
    pub shutdown: Arc<ShutdownCoordinator>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let weather_client = OpenMeteoClient::new(config.open_meteo_config())
            .context("Failed to build Open-Meteo client")?;

        let metrics =
            ServerMetrics::new(None).context("Failed to create server metrics")?;

        Ok(Self {
            telemetry: Telemetry::new(Some(metrics)),
            weather_client,
            config: Arc::new(config),
            shutdown: Arc::new(ShutdownCoordinator::new()),
        })
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    // Service port
    #[serde(default = "default_api_service_port")]
    pub api_service_port: String,

    // Loggers
    #[serde(default = "default_rust_log")]
    pub rust_log: String,
    #[serde(default)]
    pub log_format: String,

    // Upstream (Open-Meteo)
    #[serde(default = "default_geocoding_base_url")]
    pub geocoding_base_url: String,
    #[serde(default = "default_forecast_base_url")]
    pub forecast_base_url: String,
    #[serde(default = "default_geocoding_language")]
    pub geocoding_language: String,
    #[serde(default = "default_upstream_timeout_secs")]
    pub upstream_timeout_secs: u64,

    // History cookie
    #[serde(default = "default_history_cookie_max_age_days")]
    pub history_cookie_max_age_days: i64,
    #[serde(default)]
    pub cookie_secure: bool,

    // Error reporting
    #[serde(default)]
    pub sentry_dsn: Option<String>,
}

fn default_api_service_port() -> String {
    "8000".to_string()
}

fn default_rust_log() -> String {
    "info".to_string()
}

fn default_geocoding_base_url() -> String {
    open_meteo_client::client::GEOCODING_API_BASE.to_string()
}

fn default_forecast_base_url() -> String {
    open_meteo_client::client::FORECAST_API_BASE.to_string()
}

fn default_geocoding_language() -> String {
    "ru".to_string()
}

fn default_upstream_timeout_secs() -> u64 {
    10
}

fn default_history_cookie_max_age_days() -> i64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_service_port: default_api_service_port(),
            rust_log: default_rust_log(),
            log_format: String::new(),
            geocoding_base_url: default_geocoding_base_url(),
            forecast_base_url: default_forecast_base_url(),
            geocoding_language: default_geocoding_language(),
            upstream_timeout_secs: default_upstream_timeout_secs(),
            history_cookie_max_age_days: default_history_cookie_max_age_days(),
            cookie_secure: false,
            sentry_dsn: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, envy::Error> {
        // Load .env file if present (useful when running outside docker-compose)
        match dotenv::dotenv() {
            Ok(path) => eprintln!("Loaded .env from: {}", path.display()),
            Err(e) => eprintln!("dotenv warning: {e}"),
        }

        envy::from_env::<Config>()
    }

    pub fn open_meteo_config(&self) -> OpenMeteoConfig {
        OpenMeteoConfig {
            geocoding_base_url: self.geocoding_base_url.clone(),
            forecast_base_url: self.forecast_base_url.clone(),
            language: self.geocoding_language.clone(),
            timeout: Duration::from_secs(self.upstream_timeout_secs),
            ..Default::default()
        }
    }

    pub fn history_cookie_max_age(&self) -> time::Duration {
        time::Duration::days(self.history_cookie_max_age_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env_uses_defaults() {
        let config =
            envy::from_iter::<_, Config>(Vec::<(String, String)>::new())
                .unwrap();

        assert_eq!(config.api_service_port, "8000");
        assert_eq!(config.geocoding_language, "ru");
        assert_eq!(config.upstream_timeout_secs, 10);
        assert_eq!(config.history_cookie_max_age(), time::Duration::days(30));
        assert!(!config.cookie_secure);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_config_from_env_overrides() {
        let config = envy::from_iter::<_, Config>(vec![
            ("API_SERVICE_PORT".to_string(), "9000".to_string()),
            ("UPSTREAM_TIMEOUT_SECS".to_string(), "5".to_string()),
            ("GEOCODING_LANGUAGE".to_string(), "en".to_string()),
            ("COOKIE_SECURE".to_string(), "true".to_string()),
        ])
        .unwrap();

        let upstream = config.open_meteo_config();
        assert_eq!(config.api_service_port, "9000");
        assert_eq!(upstream.timeout, Duration::from_secs(5));
        assert_eq!(upstream.language, "en");
        assert!(config.cookie_secure);
    }
}
