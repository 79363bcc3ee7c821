use axum::Json;
use axum::http::StatusCode;

use crate::shared::extractors::history::SearchHistory;

use super::models::HistoryResponse;

/// Search frequency for the caller
///
/// Counts each city in the `weatherHistory` cookie. A missing or unreadable
/// cookie yields an empty object.
#[utoipa::path(
    get,
    path = "/weather-history",
    responses(
        (status = 200, description = "City name to number of searches", body = HistoryResponse),
    ),
    tag = "weather",
)]
#[tracing::instrument(skip_all, name = "weather_history")]
pub async fn handler(
    SearchHistory(history): SearchHistory,
) -> (StatusCode, Json<HistoryResponse>) {
    tracing::debug!(entries = history.len(), "History request");

    (StatusCode::OK, Json(HistoryResponse(history.to_frequency_map())))
}
