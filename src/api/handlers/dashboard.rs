//! Handler for the dashboard summary.

use axum::{Extension, Json, extract::State};

use crate::api::dto::dashboard::DashboardResponse;
use crate::api::dto::urls::UrlResponse;
use crate::application::services::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the authenticated user's dashboard.
///
/// # Endpoint
///
/// `GET /api/dashboard`
///
/// # Response
///
/// Headline metrics (totals, click-through rate, today/this week), the 10
/// most recent links and a 30-day click series with zero-filled gaps.
pub async fn dashboard_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DashboardResponse>, AppError> {
    let dashboard = state.stats_service.dashboard(user.user_id).await?;

    let recent_urls = dashboard
        .recent_links
        .into_iter()
        .map(|link| {
            let short_url = state.link_service.short_url(&link.short_code);
            UrlResponse::from_link(link, short_url)
        })
        .collect();

    Ok(Json(DashboardResponse {
        metrics: dashboard.metrics.into(),
        recent_urls,
        analytics_data: dashboard.daily_series.into_iter().map(Into::into).collect(),
    }))
}
