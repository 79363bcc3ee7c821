// The OpenApi derive macro generates code using Iterator::for_each,
// which is disallowed by our clippy config. Allow it at module level.
#![allow(clippy::disallowed_methods)]

use utoipa::OpenApi;

/// OpenAPI documentation for the weather API
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::core::v1::weather::forecast::handler::handler,
        crate::api::core::v1::weather::suggestions::handler::handler,
        crate::api::core::v1::weather::history::handler::handler,
    ),
    components(schemas(
        crate::api::error_v1::ApiV1Error,
        crate::api::error_v1::ApiV1Detail,
        crate::api::core::v1::weather::forecast::models::CityRequest,
        crate::api::core::v1::weather::forecast::models::WeatherResponse,
        crate::api::core::v1::weather::suggestions::models::CitySuggestion,
        crate::api::core::v1::weather::history::models::HistoryResponse,
    )),
    info(
        title = "Weather Explorer API",
        version = "1.0.0",
        description = "City weather lookup backed by Open-Meteo, with autocomplete and cookie-based search history",
        license(name = "Apache-2.0")
    ),
    servers(
        (url = "/api", description = "Weather API")
    ),
    tags(
        (name = "weather", description = "Forecasts, city suggestions and search history")
    )
)]
pub struct WeatherApiDoc;

impl WeatherApiDoc {
    pub fn openapi() -> utoipa::openapi::OpenApi {
        <WeatherApiDoc as utoipa::OpenApi>::openapi()
    }

    /// OpenAPI document as JSON; `Value::Null` if serialization fails.
    pub fn openapi_json() -> serde_json::Value {
        serde_json::to_value(Self::openapi()).unwrap_or_else(|e| {
            tracing::error!("Failed to serialize OpenAPI spec: {e}");
            serde_json::Value::Null
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_weather_paths() {
        let json = WeatherApiDoc::openapi_json();
        let paths = json["paths"].as_object().unwrap();

        assert!(paths.contains_key("/weather"));
        assert!(paths.contains_key("/city-suggestions"));
        assert!(paths.contains_key("/weather-history"));
        assert!(json["components"]["schemas"]["ApiV1Error"].is_object());
    }
}
