//! Handlers for link management: create, list, delete.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::urls::{CreateUrlRequest, UrlListResponse, UrlResponse};
use crate::application::services::{AuthUser, CreateLink};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for the authenticated user.
///
/// # Endpoint
///
/// `POST /api/urls`
///
/// # Errors
///
/// Returns 400 for a malformed URL or custom code, 409 when the custom
/// code is taken.
pub async fn create_url_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateUrlRequest>,
) -> Result<(StatusCode, Json<UrlResponse>), AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .create_link(
            user.user_id,
            CreateLink {
                original_url: payload.url,
                title: payload.title,
                custom_code: payload.custom_code,
                expires_at: payload.expires_at,
            },
        )
        .await?;

    let short_url = state.link_service.short_url(&link.short_code);

    Ok((
        StatusCode::CREATED,
        Json(UrlResponse::from_link(link, short_url)),
    ))
}

/// Lists the authenticated user's links, newest first.
///
/// # Endpoint
///
/// `GET /api/urls`
pub async fn list_urls_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UrlListResponse>, AppError> {
    let links = state.link_service.list_links(user.user_id).await?;

    let urls = links
        .into_iter()
        .map(|link| {
            let short_url = state.link_service.short_url(&link.short_code);
            UrlResponse::from_link(link, short_url)
        })
        .collect();

    Ok(Json(UrlListResponse { urls }))
}

/// Deletes one of the authenticated user's links.
///
/// Click events are removed by the foreign-key cascade.
///
/// # Endpoint
///
/// `DELETE /api/urls/{id}`
///
/// # Errors
///
/// Returns 404 for an unknown id, 403 for a link owned by someone else.
pub async fn delete_url_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.link_service.delete_link(user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
