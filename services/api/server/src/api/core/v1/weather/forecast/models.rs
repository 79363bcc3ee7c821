use open_meteo_client::GeoResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request payload for a weather lookup
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CityRequest {
    /// Free-text city name of any length; sent to geocoding as typed
    #[schema(example = "Москва")]
    pub city: String,
}

/// Where the forecast was resolved to
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LocationSummary {
    #[schema(example = "Москва")]
    pub name: String,
    /// Region / first-level administrative area
    #[schema(example = "Москва")]
    pub admin1: Option<String>,
    #[schema(example = "Россия")]
    pub country: Option<String>,
}

impl From<GeoResult> for LocationSummary {
    fn from(result: GeoResult) -> Self {
        Self {
            name: result.name,
            admin1: result.admin1,
            country: result.country,
        }
    }
}

/// Location summary plus the upstream forecast document
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WeatherResponse {
    pub location: LocationSummary,
    /// Open-Meteo forecast passed through unmodified
    #[schema(value_type = Object)]
    pub weather: serde_json::Value,
}
