use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;

use crate::AppState;
use crate::shared::extractors::request_id::RequestId;

use super::models::{CitySuggestion, SuggestionQuery};

const HANDLER_NAME: &str = "city_suggestions";
/// Shorter queries return nothing without calling upstream.
const MIN_QUERY_CHARS: usize = 2;

/// Autocomplete city names
///
/// Returns up to 5 candidates. Upstream failures are logged and produce an
/// empty list; this endpoint never returns an error.
#[utoipa::path(
    get,
    path = "/city-suggestions",
    params(SuggestionQuery),
    responses(
        (status = 200, description = "Up to 5 city suggestions", body = Vec<CitySuggestion>),
    ),
    tag = "weather",
)]
#[tracing::instrument(skip_all, name = "city_suggestions")]
pub async fn handler(
    State(state): State<AppState>,
    RequestId(request_id): RequestId,
    Query(query): Query<SuggestionQuery>,
) -> (StatusCode, Json<Vec<CitySuggestion>>) {
    if query.q.chars().count() < MIN_QUERY_CHARS {
        return (StatusCode::OK, Json(Vec::new()));
    }

    let suggestions = match state.weather_client.suggest(&query.q).await {
        Ok(results) => {
            results.into_iter().map(CitySuggestion::from).collect()
        }
        Err(e) => {
            tracing::warn!(
                q = %query.q,
                error = %e,
                request_id = %request_id,
                "Error fetching suggestions",
            );
            state.telemetry.maybe_use_metrics(|m| {
                m.record_error(HANDLER_NAME, e.code());
                if let Some(stage) = e.stage() {
                    m.record_upstream_failure(stage.as_str(), e.code());
                }
            });
            Vec::new()
        }
    };

    (StatusCode::OK, Json(suggestions))
}
