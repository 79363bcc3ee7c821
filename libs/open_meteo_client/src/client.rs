use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::{
    error::{OpenMeteoClientResult, OpenMeteoError},
    models::*,
};

pub const GEOCODING_API_BASE: &str = "https://geocoding-api.open-meteo.com/v1";
pub const FORECAST_API_BASE: &str = "https://api.open-meteo.com/v1";

const HOURLY_FIELDS: &str = "temperature_2m,relativehumidity_2m,apparent_temperature,precipitation_probability,weathercode,windspeed_10m";
const DAILY_FIELDS: &str =
    "weathercode,temperature_2m_max,temperature_2m_min,precipitation_sum";

/// Result cap used when resolving a single city.
const RESOLVE_COUNT: u8 = 1;
/// Result cap used for autocomplete.
pub const SUGGESTION_COUNT: u8 = 5;

#[derive(Debug, Clone)]
pub struct OpenMeteoConfig {
    pub geocoding_base_url: String,
    pub forecast_base_url: String,
    /// Language of place names returned by geocoding.
    pub language: String,
    /// Bound applied to every outbound call.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for OpenMeteoConfig {
    fn default() -> Self {
        Self {
            geocoding_base_url: GEOCODING_API_BASE.to_string(),
            forecast_base_url: FORECAST_API_BASE.to_string(),
            language: "ru".to_string(),
            timeout: Duration::from_secs(10),
            user_agent: concat!("weather-api/", env!("CARGO_PKG_VERSION"))
                .to_string(),
        }
    }
}

/// Client for the Open-Meteo geocoding and forecast endpoints.
///
/// Cloning is cheap; all clones share one connection pool.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: reqwest::Client,
    config: Arc<OpenMeteoConfig>,
}

impl OpenMeteoClient {
    pub fn new(config: OpenMeteoConfig) -> OpenMeteoClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(OpenMeteoError::ClientBuild)?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &OpenMeteoConfig {
        &self.config
    }

    /// Search for places by name. An unmatched name yields an empty list.
    #[instrument(skip(self), level = "debug")]
    pub async fn geocode(
        &self,
        name: &str,
        count: u8,
    ) -> OpenMeteoClientResult<Vec<GeoResult>> {
        let url = format!(
            "{}/search",
            self.config.geocoding_base_url.trim_end_matches('/')
        );
        let count = count.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("name", name),
                ("count", count.as_str()),
                ("language", self.config.language.as_str()),
                ("format", "json"),
            ])
            .send()
            .await
            .map_err(|source| OpenMeteoError::UpstreamUnavailable {
                stage: Stage::Geocode,
                source,
            })?;

        let body: GeocodingResponse =
            handle_response(Stage::Geocode, response).await?;
        Ok(body.results.unwrap_or_default())
    }

    /// Fetch current conditions plus hourly and daily series for a point.
    #[instrument(skip(self), level = "debug")]
    pub async fn forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> OpenMeteoClientResult<serde_json::Value> {
        let url = format!(
            "{}/forecast",
            self.config.forecast_base_url.trim_end_matches('/')
        );
        let latitude = latitude.to_string();
        let longitude = longitude.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("current_weather", "true"),
                ("hourly", HOURLY_FIELDS),
                ("daily", DAILY_FIELDS),
                ("timezone", "auto"),
            ])
            .send()
            .await
            .map_err(|source| OpenMeteoError::UpstreamUnavailable {
                stage: Stage::Forecast,
                source,
            })?;

        handle_response(Stage::Forecast, response).await
    }

    /// Geocode `name` to its best match, then fetch the forecast there.
    ///
    /// Fails fast: an error in either stage aborts the whole call.
    #[instrument(skip(self), level = "info")]
    pub async fn resolve_and_forecast(
        &self,
        name: &str,
    ) -> OpenMeteoClientResult<ResolvedForecast> {
        let location = self
            .geocode(name, RESOLVE_COUNT)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| OpenMeteoError::CityNotFound(name.to_string()))?;

        tracing::debug!(
            name = %location.name,
            latitude = location.latitude,
            longitude = location.longitude,
            "Resolved city"
        );

        let forecast =
            self.forecast(location.latitude, location.longitude).await?;

        Ok(ResolvedForecast { location, forecast })
    }

    /// Autocomplete candidates for a partial place name.
    pub async fn suggest(
        &self,
        query: &str,
    ) -> OpenMeteoClientResult<Vec<GeoResult>> {
        self.geocode(query, SUGGESTION_COUNT).await
    }
}

async fn handle_response<T: DeserializeOwned>(
    stage: Stage,
    response: reqwest::Response,
) -> OpenMeteoClientResult<T> {
    let status = response.status();

    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(OpenMeteoError::UpstreamError {
            stage,
            status: Some(status.as_u16()),
            message: format!("status {status}: {text}"),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|source| OpenMeteoError::UpstreamUnavailable { stage, source })?;

    serde_json::from_slice(&bytes).map_err(|e| OpenMeteoError::UpstreamError {
        stage,
        status: Some(status.as_u16()),
        message: format!("JSON parse error: {e}"),
    })
}
