//! Handler for per-link statistics.

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::api::dto::stats::UrlStatsResponse;
use crate::api::dto::urls::UrlResponse;
use crate::application::services::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Returns analytics for one of the authenticated user's links.
///
/// # Endpoint
///
/// `GET /api/urls/{id}/stats`
///
/// # Response
///
/// Link metadata, the true click count from the analytics table, per-day
/// click counts over the link's lifetime and the 10 most recent clicks.
///
/// # Errors
///
/// Returns 404 for an unknown id, 403 for a link owned by someone else.
pub async fn url_stats_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<UrlStatsResponse>, AppError> {
    let link = state.link_service.get_owned(user.user_id, id).await?;
    let report = state.stats_service.link_stats(&link).await?;

    let short_url = state.link_service.short_url(&link.short_code);

    Ok(Json(UrlStatsResponse {
        url: UrlResponse::from_link(link, short_url),
        total_clicks: report.total_clicks,
        clicks_over_time: report.daily_series.into_iter().map(Into::into).collect(),
        recent_clicks: report.recent_clicks.into_iter().map(Into::into).collect(),
    }))
}
