use axum::extract::rejection::BytesRejection;
use axum::extract::{FromRequest, Request};
use axum::http::{HeaderMap, header};
use axum::response::Response;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use thiserror::Error;
use uuid::Uuid;

use crate::api::error_v1::{ApiV1Detail, ApiV1Error};

/// JSON body extractor that reports the failing field path on bad input.
#[derive(Debug, Clone, Copy, Default)]
#[must_use]
pub struct Payload<T>(pub T);

impl<T, S> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(
        req: Request,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        if json_content_type(req.headers()) {
            let bytes = Bytes::from_request(req, state).await?;
            let deserializer =
                &mut serde_json::Deserializer::from_slice(&bytes);
            let value: T = serde_path_to_error::deserialize(deserializer)?;

            Ok(Payload(value))
        } else {
            Err(Error::MissingJsonContentType)
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Bytes(#[from] BytesRejection),

    #[error(transparent)]
    Json(#[from] serde_path_to_error::Error<serde_json::Error>),

    #[error("missing content-type header")]
    MissingJsonContentType,
}

impl axum::response::IntoResponse for Error {
    fn into_response(self) -> Response {
        self.to_api_v1_error(&Uuid::new_v4()).into_response()
    }
}

impl Error {
    pub fn to_api_v1_error(&self, request_id: &Uuid) -> ApiV1Error {
        let detail = match self {
            Error::Json(serde_err) => json_error_detail(serde_err),
            Error::MissingJsonContentType => ApiV1Detail {
                field: Some("Content-Type".to_string()),
                code: "missing_content_type".to_string(),
                message: "Content-Type header must be application/json"
                    .to_string(),
                suggestion: "Set Content-Type header to application/json"
                    .to_string(),
            },
            Error::Bytes(_) => ApiV1Detail {
                field: Some("request".to_string()),
                code: "request_body_error".to_string(),
                message: "Unable to read request body".to_string(),
                suggestion: "Check the request body and content length"
                    .to_string(),
            },
        };

        ApiV1Error::bad_request(
            "Invalid request payload".to_string(),
            vec![detail],
            request_id.to_string(),
        )
    }
}

fn json_error_detail(
    serde_err: &serde_path_to_error::Error<serde_json::Error>,
) -> ApiV1Detail {
    let field_path = match serde_err.path().to_string() {
        root if root == "." => String::new(),
        path => path,
    };
    let inner_message = serde_err.inner().to_string();

    if let Some(missing) = extract_missing_field_from_message(&inner_message) {
        let field = if field_path.is_empty() {
            missing
        } else {
            format!("{field_path}.{missing}")
        };
        return ApiV1Detail {
            message: format!("Missing required field: {field}"),
            field: Some(field),
            code: "missing_field".to_string(),
            suggestion: "Add the missing field to the request body".to_string(),
        };
    }

    if field_path.is_empty() {
        return ApiV1Detail {
            field: Some("request".to_string()),
            code: "invalid_json".to_string(),
            message: format!("Invalid JSON: {inner_message}"),
            suggestion: "Send a JSON object".to_string(),
        };
    }

    ApiV1Detail {
        message: format!(
            "Invalid value for field '{field_path}': {inner_message}"
        ),
        field: Some(field_path),
        code: "invalid_field".to_string(),
        suggestion: "Check the field value and format".to_string(),
    }
}

/// Extracts the field name from a serde "missing field" error message
/// Example: "missing field `city`" -> Some("city")
fn extract_missing_field_from_message(message: &str) -> Option<String> {
    let start = message.find("missing field")?;
    let after_missing = &message[start + "missing field".len()..];

    let backtick_start = after_missing.find('`')?;
    let rest = &after_missing[backtick_start + 1..];
    let backtick_end = rest.find('`')?;

    Some(rest[..backtick_end].to_string())
}

fn json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(header::CONTENT_TYPE) else {
        return false;
    };

    let Ok(content_type) = content_type.to_str() else {
        return false;
    };

    let Ok(mime) = content_type.parse::<mime::Mime>() else {
        return false;
    };

    mime.type_() == "application"
        && (mime.subtype() == "json"
            || mime.suffix().is_some_and(|name| name == "json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[derive(Debug, serde::Deserialize)]
    #[allow(dead_code)]
    struct Body {
        city: String,
    }

    fn json_error(input: &str) -> serde_path_to_error::Error<serde_json::Error> {
        let deserializer = &mut serde_json::Deserializer::from_str(input);
        serde_path_to_error::deserialize::<_, Body>(deserializer).unwrap_err()
    }

    #[test]
    fn test_missing_field_is_named() {
        let detail = json_error_detail(&json_error("{}"));
        assert_eq!(detail.field.as_deref(), Some("city"));
        assert_eq!(detail.code, "missing_field");
    }

    #[test]
    fn test_wrong_type_reports_path() {
        let detail = json_error_detail(&json_error(r#"{"city": 5}"#));
        assert_eq!(detail.field.as_deref(), Some("city"));
        assert_eq!(detail.code, "invalid_field");
    }

    #[test]
    fn test_extract_missing_field_from_message() {
        assert_eq!(
            extract_missing_field_from_message("missing field `city` at line 1"),
            Some("city".to_string())
        );
        assert_eq!(extract_missing_field_from_message("expected value"), None);
    }

    #[test]
    fn test_json_content_type_detection() {
        let mut headers = HeaderMap::new();
        assert!(!json_content_type(&headers));

        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        assert!(json_content_type(&headers));

        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/vnd.api+json"),
        );
        assert!(json_content_type(&headers));

        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        assert!(!json_content_type(&headers));
    }
}
