//! DTOs for the dashboard endpoint.

use serde::Serialize;

use crate::api::dto::stats::DailyClicksDto;
use crate::api::dto::urls::UrlResponse;
use crate::application::services::DashboardMetrics;

/// Headline numbers for the authenticated user.
#[derive(Debug, Serialize)]
pub struct MetricsDto {
    pub total_urls: i64,
    pub total_clicks: i64,
    pub click_through_rate: f64,
    pub active_urls: i64,
    pub clicks_today: i64,
    pub clicks_this_week: i64,
}

impl From<DashboardMetrics> for MetricsDto {
    fn from(m: DashboardMetrics) -> Self {
        Self {
            total_urls: m.total_urls,
            total_clicks: m.total_clicks,
            click_through_rate: m.click_through_rate,
            active_urls: m.active_urls,
            clicks_today: m.clicks_today,
            clicks_this_week: m.clicks_this_week,
        }
    }
}

/// Response for `GET /api/dashboard`.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub metrics: MetricsDto,
    pub recent_urls: Vec<UrlResponse>,
    /// 30 entries, chronological, zero-filled.
    pub analytics_data: Vec<DailyClicksDto>,
}
