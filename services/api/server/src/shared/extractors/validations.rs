use crate::api::error_v1::{ApiV1Detail, ApiV1Error};
use crate::shared::extractors::payload;
use crate::shared::extractors::payload::Payload;
use crate::shared::extractors::request_id::RequestId;
use axum::extract::{FromRequest, Request};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use uuid::Uuid;

/// ValidatedPayload uses the full request body and therefore should always appear after
/// other extractors that might implement FromRequestParts instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedPayload<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedPayload<T>
where
    T: serde::de::DeserializeOwned + validator::Validate,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(
        req: Request,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        // Read the request ID before the body consumes the request
        let RequestId(request_id) = RequestId::from_headers(req.headers());

        let Payload(value) = Payload::<T>::from_request(req, state)
            .await
            .map_err(|e| Error::Payload(e, request_id))?;

        match value.validate() {
            Ok(_) => Ok(ValidatedPayload(value)),
            Err(e) => Err(Error::Validation(e, request_id)),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Validation failed")]
    Validation(validator::ValidationErrors, Uuid),

    #[error("Payload error")]
    Payload(payload::Error, Uuid),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        self.to_api_v1_error().into_response()
    }
}

impl Error {
    pub fn to_api_v1_error(&self) -> ApiV1Error {
        match self {
            Error::Validation(validation_errors, request_id) => {
                ApiV1Error::bad_request(
                    "Validation failed".to_string(),
                    validation_errors_to_details(validation_errors),
                    request_id.to_string(),
                )
            }
            Error::Payload(payload_err, request_id) => {
                payload_err.to_api_v1_error(request_id)
            }
        }
    }
}

/// Transforms field-level ValidationErrors into ApiV1Detail entries.
fn validation_errors_to_details(
    errors: &validator::ValidationErrors,
) -> Vec<ApiV1Detail> {
    let mut details: Vec<ApiV1Detail> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            field_errors.iter().map(move |error| ApiV1Detail {
                field: Some(field.to_string()),
                code: error.code.to_string(),
                message: error
                    .message
                    .as_ref()
                    .unwrap_or(&error.code)
                    .to_string(),
                suggestion: "Check the field value and format".to_string(),
            })
        })
        .collect();

    // If no specific field errors, return a generic error
    if details.is_empty() {
        details.push(ApiV1Detail {
            field: Some("request".to_string()),
            code: "validation_failed".to_string(),
            message: "Validation failed".to_string(),
            suggestion:
                "Check the request parameters and format of the request body"
                    .to_string(),
        });
    }

    details
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(length(max = 3, message = "too long"))]
        city: String,
    }

    #[test]
    fn test_field_errors_become_details() {
        let errors = Probe {
            city: "Berlin".to_string(),
        }
        .validate()
        .unwrap_err();

        let details = validation_errors_to_details(&errors);
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].field.as_deref(), Some("city"));
        assert_eq!(details[0].code, "length");
        assert_eq!(details[0].message, "too long");
    }

    #[test]
    fn test_empty_errors_get_generic_detail() {
        let details =
            validation_errors_to_details(&validator::ValidationErrors::new());
        assert_eq!(details[0].code, "validation_failed");
    }
}
