use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::cookie::CookieJar;
use open_meteo_client::OpenMeteoError;

use crate::AppState;
use crate::api::error_recorder::ErrorRecorder;
use crate::api::error_v1::ApiV1Error;
use crate::shared::extractors::history::{SearchHistory, history_cookie};
use crate::shared::extractors::request_id::RequestId;
use crate::shared::extractors::validations::ValidatedPayload;

use super::errors::{self, HandlerResult};
use super::models::{CityRequest, LocationSummary, WeatherResponse};

const HANDLER_NAME: &str = "weather_forecast";

/// Current conditions and forecast for a city
///
/// Geocodes the city, fetches the forecast at the best match and appends
/// the city to the caller's `weatherHistory` cookie. Failed lookups leave
/// the cookie untouched.
#[utoipa::path(
    post,
    path = "/weather",
    request_body = CityRequest,
    responses(
        (status = 200, description = "Location and forecast; sets the weatherHistory cookie", body = WeatherResponse),
        (status = 400, description = "Invalid request payload", body = ApiV1Error),
        (status = 404, description = "No place matches the city name", body = ApiV1Error),
        (status = 502, description = "Weather service returned an invalid response", body = ApiV1Error),
        (status = 503, description = "Weather service unreachable", body = ApiV1Error),
    ),
    tag = "weather",
)]
#[tracing::instrument(skip_all, name = "weather_forecast")]
pub async fn handler(
    State(state): State<AppState>,
    RequestId(request_id): RequestId,
    SearchHistory(history): SearchHistory,
    jar: CookieJar,
    ValidatedPayload(payload): ValidatedPayload<CityRequest>,
) -> HandlerResult<(StatusCode, CookieJar, Json<WeatherResponse>)> {
    tracing::info!(
        city = %payload.city,
        history_len = history.len(),
        request_id = %request_id,
        "Weather request",
    );

    let recorder =
        ErrorRecorder::new(&state.telemetry, HANDLER_NAME, &request_id);

    let resolved = state
        .weather_client
        .resolve_and_forecast(&payload.city)
        .await
        .map_err(|e| {
            let code = e.code();
            if let OpenMeteoError::CityNotFound(_) = e {
                tracing::info!(city = %payload.city, "City not found");
            } else {
                let stage = e.stage().map_or("client", |s| s.as_str());
                tracing::warn!(
                    city = %payload.city,
                    stage,
                    error = %e,
                    "Weather lookup failed",
                );
                state.telemetry.maybe_use_metrics(|m| {
                    m.record_upstream_failure(stage, code)
                });
            }
            recorder.record(code, errors::Error::from(e))
        })?;

    let history = history.append(payload.city);
    let jar = jar.add(history_cookie(&history, &state.config));

    let response = WeatherResponse {
        location: LocationSummary::from(resolved.location),
        weather: resolved.forecast,
    };

    Ok((StatusCode::OK, jar, Json(response)))
}
