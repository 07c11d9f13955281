//! Handler for short URL redirects.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use std::net::SocketAddr;
use tracing::debug;

use crate::domain::click_event::ClickEvent;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::extract_client_ip;

/// Redirects a short code to its stored URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Behavior
///
/// Resolves only active, unexpired links; everything else is a 404. On a
/// hit, a click event is pushed onto the bounded worker queue with
/// `try_send` (a full queue drops the event) and the response is a
/// `301 Moved Permanently` carrying the exact stored URL. The analytics
/// path can never fail or delay the redirect.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<impl IntoResponse, AppError> {
    let link = state.link_service.resolve(&code).await?;

    let ip = extract_client_ip(&headers, addr.ip(), state.trust_proxy_headers);
    let event = ClickEvent::new(
        link.id,
        ip,
        headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok()),
        headers.get(header::REFERER).and_then(|v| v.to_str().ok()),
    );

    if state.click_sender.try_send(event).is_err() {
        debug!(code = %code, "Click queue unavailable, dropping event");
    }

    Ok((
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, link.original_url)],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{MockConnectInfoLayer, TestState};
    use crate::domain::repositories::MockLinkRepository;
    use axum::{Router, routing::get};
    use axum_test::TestServer;
    use chrono::Utc;

    fn resolvable_link(id: i64, code: &str, url: &str) -> crate::domain::entities::ShortLink {
        let now = Utc::now();
        crate::domain::entities::ShortLink {
            id,
            user_id: 1,
            original_url: url.to_string(),
            short_code: code.to_string(),
            title: None,
            click_count: 0,
            last_clicked_at: None,
            is_active: true,
            expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn server(state: crate::state::AppState) -> TestServer {
        let app = Router::new()
            .route("/{code}", get(redirect_handler))
            .layer(MockConnectInfoLayer)
            .with_state(state);
        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn test_redirect_success() {
        let mut links = MockLinkRepository::new();
        links
            .expect_find_resolvable()
            .withf(|code| code == "go1234")
            .times(1)
            .returning(|_| Ok(Some(resolvable_link(1, "go1234", "https://example.com/target"))));

        let (state, _rx) = TestState::new().links(links).build();
        let server = server(state);

        let response = server.get("/go1234").await;

        assert_eq!(response.status_code(), 301);
        assert_eq!(response.header("location"), "https://example.com/target");
    }

    #[tokio::test]
    async fn test_redirect_unknown_code() {
        let mut links = MockLinkRepository::new();
        links.expect_find_resolvable().returning(|_| Ok(None));

        let (state, _rx) = TestState::new().links(links).build();
        let server = server(state);

        let response = server.get("/ghost1").await;
        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn test_redirect_enqueues_click_event() {
        let mut links = MockLinkRepository::new();
        links
            .expect_find_resolvable()
            .returning(|_| Ok(Some(resolvable_link(7, "track1", "https://example.com"))));

        let (state, mut rx) = TestState::new().links(links).build();
        let server = server(state);

        let response = server
            .get("/track1")
            .add_header("User-Agent", "Mozilla/5.0")
            .add_header("Referer", "https://google.com")
            .await;

        assert_eq!(response.status_code(), 301);

        let event = rx.try_recv().unwrap();
        assert_eq!(event.url_id, 7);
        assert_eq!(event.user_agent.as_deref(), Some("Mozilla/5.0"));
        assert_eq!(event.referer.as_deref(), Some("https://google.com"));
    }

    #[tokio::test]
    async fn test_redirect_succeeds_when_queue_closed() {
        let mut links = MockLinkRepository::new();
        links
            .expect_find_resolvable()
            .returning(|_| Ok(Some(resolvable_link(1, "go1234", "https://example.com/page"))));

        let (state, rx) = TestState::new().links(links).build();
        // Simulate a dead analytics pipeline.
        drop(rx);
        let server = server(state);

        let response = server.get("/go1234").await;

        assert_eq!(response.status_code(), 301);
        assert_eq!(response.header("location"), "https://example.com/page");
    }
}
