//! API route definitions.

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::api::handlers::{
    create_url_handler, dashboard_handler, delete_url_handler, list_urls_handler,
    url_stats_handler,
};
use crate::state::AppState;

/// Routes requiring bearer authentication; the auth middleware is attached
/// by the top-level router.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard_handler))
        .route("/urls", post(create_url_handler).get(list_urls_handler))
        .route("/urls/{id}/stats", get(url_stats_handler))
        .route("/urls/{id}", delete(delete_url_handler))
}
