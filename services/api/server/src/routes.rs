use axum::http::{StatusCode, header};
use axum::response::Json;
use axum::{Router, routing::get};
use serde_json::json;
use tower_http::{
    catch_panic::CatchPanicLayer, compression::CompressionLayer,
    cors::CorsLayer, trace::TraceLayer,
};

use crate::AppState;

pub const VERSION: Option<&'static str> = option_env!("VERSION");

async fn fallback_handler() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Not Found",
            "message": "The requested endpoint does not exist",
            "status": 404
        })),
    )
}

/// Full application router: operational endpoints, the weather API under
/// `/api` and the OpenAPI document.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", {
            let state = state.clone();
            get(move || {
                let state = state.clone();
                async move { crate::health::handler(state).await }
            })
        })
        .route("/version", get(|| async { VERSION.unwrap_or("unknown") }))
        .route("/metrics", {
            let telemetry = state.telemetry.clone();
            get(move || {
                let telemetry = telemetry.clone();
                async move {
                    (
                        StatusCode::OK,
                        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                        telemetry.get_metrics().await,
                    )
                }
            })
        })
        .nest("/api", crate::get_weather_api_v1_routes(state))
        .fallback(fallback_handler)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CatchPanicLayer::new())
        .merge(crate::get_openapi_routes())
}
