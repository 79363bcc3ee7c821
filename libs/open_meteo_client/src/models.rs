use serde::{Deserialize, Serialize};

/// One hit from the geocoding search endpoint.
///
/// Open-Meteo returns many more fields (elevation, timezone, population...);
/// only the ones the service forwards are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoResult {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// First-level administrative area (region, oblast, state).
    #[serde(default)]
    pub admin1: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodingResponse {
    /// Absent (not empty) when nothing matched.
    #[serde(default)]
    pub(crate) results: Option<Vec<GeoResult>>,
}

/// Output of the geocode-then-forecast pipeline.
#[derive(Debug, Clone)]
pub struct ResolvedForecast {
    pub location: GeoResult,
    /// Forecast document passed through unmodified.
    pub forecast: serde_json::Value,
}

/// Which upstream call an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Geocode,
    Forecast,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Geocode => "geocode",
            Stage::Forecast => "forecast",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
