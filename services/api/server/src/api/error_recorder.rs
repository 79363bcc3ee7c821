use std::sync::Arc;

use telemetry::metrics::Telemetry;
use uuid::Uuid;

use crate::api::error_v1::ApiV1Error;
use crate::metrics::ServerMetrics;

/// Trait for handler error types that can be converted to [`ApiV1Error`].
pub trait IntoApiV1Error {
    fn into_api_v1_error(self, request_id: &Uuid) -> ApiV1Error;
}

/// Records error metrics and converts handler errors to [`ApiV1Error`].
pub struct ErrorRecorder<'a> {
    telemetry: &'a Arc<Telemetry<ServerMetrics>>,
    handler_name: &'a str,
    request_id: &'a Uuid,
}

impl<'a> ErrorRecorder<'a> {
    pub fn new(
        telemetry: &'a Arc<Telemetry<ServerMetrics>>,
        handler_name: &'a str,
        request_id: &'a Uuid,
    ) -> Self {
        Self {
            telemetry,
            handler_name,
            request_id,
        }
    }

    pub fn record<E: IntoApiV1Error>(&self, code: &str, e: E) -> ApiV1Error {
        self.telemetry.maybe_use_metrics(|m| {
            m.record_error(self.handler_name, code);
        });
        e.into_api_v1_error(self.request_id)
    }
}
