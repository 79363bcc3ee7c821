use axum::Router;

pub(crate) mod weather;

pub fn get_routes(state: crate::AppState) -> Router {
    Router::new().merge(weather::get_routes(state))
}
