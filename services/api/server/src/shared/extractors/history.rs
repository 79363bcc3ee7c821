use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use weather_history::History;

use crate::{AppState, Config};

pub const HISTORY_COOKIE: &str = "weatherHistory";

/// The caller's search history, decoded from the `weatherHistory` cookie.
///
/// Never rejects: an absent cookie is an empty history, and an unreadable
/// one is logged, counted and treated as empty.
#[derive(Debug, Clone, Default)]
pub struct SearchHistory(pub History);

impl FromRequestParts<AppState> for SearchHistory {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let Some(cookie) = jar.get(HISTORY_COOKIE) else {
            return Ok(Self::default());
        };

        match History::try_decode(cookie.value()) {
            Ok(history) => Ok(Self(history)),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Discarding unreadable history cookie"
                );
                state
                    .telemetry
                    .maybe_use_metrics(|m| m.record_history_decode_failure());
                Ok(Self::default())
            }
        }
    }
}

/// Cookie carrying `history` back to the client.
pub fn history_cookie(history: &History, config: &Config) -> Cookie<'static> {
    Cookie::build((HISTORY_COOKIE, history.encode()))
        .path("/")
        .max_age(config.history_cookie_max_age())
        .same_site(SameSite::Lax)
        .http_only(true)
        .secure(config.cookie_secure)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, header};

    async fn extract(cookie_header: Option<&str>) -> History {
        let state = AppState::new(Config::default()).unwrap();
        let mut builder = Request::builder().uri("/api/weather-history");
        if let Some(value) = cookie_header {
            builder = builder.header(header::COOKIE, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();

        let Ok(SearchHistory(history)) =
            SearchHistory::from_request_parts(&mut parts, &state).await;
        history
    }

    #[tokio::test]
    async fn test_absent_cookie_is_empty_history() {
        assert!(extract(None).await.is_empty());
        assert!(extract(Some("other=1")).await.is_empty());
    }

    #[tokio::test]
    async fn test_percent_encoded_cookie_is_decoded() {
        let history =
            extract(Some("weatherHistory=%5B%22Paris%22%2C%22Paris%22%5D"))
                .await;
        assert_eq!(history, History::from_iter(["Paris", "Paris"]));
    }

    #[tokio::test]
    async fn test_corrupt_cookie_is_counted_and_absorbed() {
        let state = AppState::new(Config::default()).unwrap();
        let (mut parts, _) = Request::builder()
            .header(header::COOKIE, "weatherHistory=invalid")
            .body(())
            .unwrap()
            .into_parts();

        let Ok(SearchHistory(history)) =
            SearchHistory::from_request_parts(&mut parts, &state).await;

        assert!(history.is_empty());
        let failures = state
            .telemetry
            .base_metrics()
            .map(|m| m.history_decode_failures.get());
        assert_eq!(failures, Some(1));
    }

    #[test]
    fn test_history_cookie_attributes() {
        let config = Config::default();
        let cookie =
            history_cookie(&History::from_iter(["Москва"]), &config);

        assert_eq!(cookie.name(), HISTORY_COOKIE);
        assert_eq!(cookie.value(), r#"["Москва"]"#);
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::days(30)));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    }
}
