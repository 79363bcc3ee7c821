use thiserror::Error;

use crate::models::Stage;

pub type OpenMeteoClientResult<T> = Result<T, OpenMeteoError>;

#[derive(Error, Debug)]
pub enum OpenMeteoError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("City not found: {0}")]
    CityNotFound(String),

    #[error("{stage} request failed: {source}")]
    UpstreamUnavailable {
        stage: Stage,
        #[source]
        source: reqwest::Error,
    },

    #[error("{stage} returned an invalid response: {message}")]
    UpstreamError {
        stage: Stage,
        status: Option<u16>,
        message: String,
    },
}

impl OpenMeteoError {
    /// Stable snake_case code, used as a metric label and in error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ClientBuild(_) => "client_build",
            Self::CityNotFound(_) => "city_not_found",
            Self::UpstreamUnavailable { .. } => "upstream_unavailable",
            Self::UpstreamError { .. } => "upstream_error",
        }
    }

    /// The pipeline stage that failed, if the failure came from a call.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::UpstreamUnavailable { stage, .. }
            | Self::UpstreamError { stage, .. } => Some(*stage),
            Self::CityNotFound(_) => Some(Stage::Geocode),
            Self::ClientBuild(_) => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::UpstreamUnavailable { source, .. } if source.is_timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        let err = OpenMeteoError::CityNotFound("Atlantis".into());
        assert_eq!(err.code(), "city_not_found");
        assert_eq!(err.stage(), Some(Stage::Geocode));

        let err = OpenMeteoError::UpstreamError {
            stage: Stage::Forecast,
            status: Some(500),
            message: "boom".into(),
        };
        assert_eq!(err.code(), "upstream_error");
        assert_eq!(err.stage(), Some(Stage::Forecast));
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_error_messages_name_the_stage() {
        let err = OpenMeteoError::UpstreamError {
            stage: Stage::Geocode,
            status: Some(502),
            message: "status 502 Bad Gateway".into(),
        };
        assert_eq!(
            err.to_string(),
            "geocode returned an invalid response: status 502 Bad Gateway"
        );
    }
}
