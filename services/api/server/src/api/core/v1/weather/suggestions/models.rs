use open_meteo_client::GeoResult;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
pub struct SuggestionQuery {
    /// Partial city name; fewer than 2 characters returns no suggestions
    #[serde(default)]
    pub q: String,
}

/// One autocomplete candidate
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct CitySuggestion {
    #[schema(example = "Санкт-Петербург")]
    pub name: String,
    /// First-level administrative area, empty when unknown
    #[schema(example = "Санкт-Петербург")]
    pub region: String,
    #[schema(example = "Россия")]
    pub country: String,
    /// `name, region, country`; empty parts keep their commas
    #[schema(example = "Санкт-Петербург, Санкт-Петербург, Россия")]
    pub full_name: String,
}

impl From<GeoResult> for CitySuggestion {
    fn from(result: GeoResult) -> Self {
        let region = result.admin1.unwrap_or_default();
        let country = result.country.unwrap_or_default();
        let full_name = format!("{}, {}, {}", result.name, region, country);

        Self {
            name: result.name,
            region,
            country,
            full_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geo(admin1: Option<&str>, country: Option<&str>) -> GeoResult {
        GeoResult {
            name: "Paris".to_string(),
            latitude: 48.85,
            longitude: 2.35,
            admin1: admin1.map(str::to_string),
            country: country.map(str::to_string),
        }
    }

    #[test]
    fn test_full_name_joins_all_parts() {
        let suggestion =
            CitySuggestion::from(geo(Some("Île-de-France"), Some("France")));
        assert_eq!(suggestion.full_name, "Paris, Île-de-France, France");
        assert_eq!(suggestion.region, "Île-de-France");
    }

    #[test]
    fn test_missing_parts_keep_their_commas() {
        let suggestion = CitySuggestion::from(geo(None, Some("France")));
        assert_eq!(suggestion.full_name, "Paris, , France");
        assert_eq!(suggestion.region, "");

        let suggestion = CitySuggestion::from(geo(None, None));
        assert_eq!(suggestion.full_name, "Paris, , ");
    }
}
