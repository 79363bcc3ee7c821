use axum::http::StatusCode;
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

/// Error body returned by every `/api` route.
///
/// The human-readable message is serialized as `error`, so clients that only
/// look for an `error` key keep working.
#[derive(Serialize, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiV1Error {
    #[serde(skip)]
    pub(crate) status_code: StatusCode,
    #[serde(rename = "error")]
    pub(crate) message: String,
    pub(crate) details: Vec<ApiV1Detail>,
    pub(crate) timestamp: String,
    pub(crate) request_id: String,
}

impl ApiV1Error {
    fn new(
        status_code: StatusCode,
        message: String,
        details: Vec<ApiV1Detail>,
        request_id: String,
    ) -> Self {
        Self {
            status_code,
            message,
            details,
            timestamp: Utc::now().to_rfc3339(),
            request_id,
        }
    }

    pub fn bad_request(
        message: String,
        details: Vec<ApiV1Detail>,
        request_id: String,
    ) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, details, request_id)
    }

    pub fn not_found(
        message: String,
        details: Vec<ApiV1Detail>,
        request_id: String,
    ) -> Self {
        Self::new(StatusCode::NOT_FOUND, message, details, request_id)
    }

    pub fn bad_gateway(
        message: String,
        details: Vec<ApiV1Detail>,
        request_id: String,
    ) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message, details, request_id)
    }

    pub fn service_unavailable(
        message: String,
        details: Vec<ApiV1Detail>,
        request_id: String,
    ) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message, details, request_id)
    }
}

#[derive(Serialize, Debug, Default, ToSchema)]
pub struct ApiV1Detail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) field: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub(crate) code: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub(crate) message: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub(crate) suggestion: String,
}

impl axum::response::IntoResponse for ApiV1Error {
    fn into_response(self) -> axum::response::Response {
        if self.status_code.is_server_error() {
            sentry::Hub::with_active(|hub| hub.capture_error(&self));
        }

        (self.status_code, axum::Json(self)).into_response()
    }
}

impl std::fmt::Display for ApiV1Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}, {}, {}",
            self.status_code,
            self.message,
            self.request_id,
            self.details
                .iter()
                .map(|d| d.message.clone())
                .collect::<Vec<String>>()
                .join(", ")
        )
    }
}

impl std::fmt::Debug for ApiV1Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Error")
            .field("status_code", &self.status_code)
            .field("message", &self.message)
            .field("details", &self.details)
            .field("timestamp", &self.timestamp)
            .field("request_id", &self.request_id)
            .finish()
    }
}

impl std::error::Error for ApiV1Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_serializes_as_error_key() {
        let err = ApiV1Error::not_found(
            "City not found".to_string(),
            vec![ApiV1Detail {
                field: Some("city".to_string()),
                code: "city_not_found".to_string(),
                ..Default::default()
            }],
            "abc".to_string(),
        );

        let body = serde_json::to_value(&err).unwrap();
        assert_eq!(body["error"], "City not found");
        assert_eq!(body["requestId"], "abc");
        assert_eq!(body["details"][0]["code"], "city_not_found");
        assert!(body["details"][0].get("suggestion").is_none());
        assert!(body.get("statusCode").is_none());
        assert_eq!(err.status_code, StatusCode::NOT_FOUND);
    }
}
