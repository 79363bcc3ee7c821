use axum::Router;

pub mod forecast;
pub mod history;
pub mod suggestions;

pub fn get_routes(state: crate::AppState) -> Router {
    Router::new()
        .route("/weather", axum::routing::post(forecast::handler::handler))
        .route(
            "/city-suggestions",
            axum::routing::get(suggestions::handler::handler),
        )
        .route(
            "/weather-history",
            axum::routing::get(history::handler::handler),
        )
        .with_state(state)
}
