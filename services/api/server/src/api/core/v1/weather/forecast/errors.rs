use open_meteo_client::OpenMeteoError;
use uuid::Uuid;

use crate::api::error_v1::{ApiV1Detail, ApiV1Error};

pub type HandlerResult<T> = Result<T, ApiV1Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("City not found: {0}")]
    CityNotFound(String),

    #[error("Weather service unreachable: {0}")]
    UpstreamUnavailable(String),

    #[error("Weather service returned an invalid response: {0}")]
    UpstreamError(String),
}

impl From<OpenMeteoError> for Error {
    fn from(err: OpenMeteoError) -> Self {
        match err {
            OpenMeteoError::CityNotFound(city) => Error::CityNotFound(city),
            OpenMeteoError::UpstreamError { .. } => {
                Error::UpstreamError(err.to_string())
            }
            OpenMeteoError::UpstreamUnavailable { .. }
            | OpenMeteoError::ClientBuild(_) => {
                Error::UpstreamUnavailable(err.to_string())
            }
        }
    }
}

impl Error {
    pub fn to_api_v1_error(self, request_id: &Uuid) -> ApiV1Error {
        match self {
            Error::CityNotFound(city) => ApiV1Error::not_found(
                "City not found".to_string(),
                vec![ApiV1Detail {
                    field: Some("city".to_string()),
                    code: "city_not_found".to_string(),
                    message: format!("No place matches '{city}'"),
                    suggestion: "Check the spelling or try a larger nearby city"
                        .to_string(),
                }],
                request_id.to_string(),
            ),
            Error::UpstreamUnavailable(e) => ApiV1Error::service_unavailable(
                "Weather service temporarily unavailable".to_string(),
                vec![ApiV1Detail {
                    field: None,
                    code: "upstream_unavailable".to_string(),
                    message: e,
                    suggestion: "Please try again later".to_string(),
                }],
                request_id.to_string(),
            ),
            Error::UpstreamError(e) => ApiV1Error::bad_gateway(
                "Weather service error".to_string(),
                vec![ApiV1Detail {
                    field: None,
                    code: "upstream_error".to_string(),
                    message: e,
                    suggestion: "Please try again later".to_string(),
                }],
                request_id.to_string(),
            ),
        }
    }
}

impl crate::api::error_recorder::IntoApiV1Error for Error {
    fn into_api_v1_error(self, request_id: &Uuid) -> ApiV1Error {
        self.to_api_v1_error(request_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use open_meteo_client::Stage;

    #[test]
    fn test_error_taxonomy_maps_to_status_codes() {
        let id = Uuid::new_v4();

        let err = Error::from(OpenMeteoError::CityNotFound("Atlantis".into()))
            .to_api_v1_error(&id);
        assert_eq!(err.status_code, StatusCode::NOT_FOUND);
        assert_eq!(err.details[0].code, "city_not_found");

        let err = Error::from(OpenMeteoError::UpstreamError {
            stage: Stage::Forecast,
            status: Some(500),
            message: "status 500".into(),
        })
        .to_api_v1_error(&id);
        assert_eq!(err.status_code, StatusCode::BAD_GATEWAY);
        assert!(err.details[0].message.starts_with("forecast"));
        assert_eq!(err.request_id, id.to_string());
    }
}
