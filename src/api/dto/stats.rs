//! DTOs for per-link statistics.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::api::dto::urls::UrlResponse;
use crate::domain::entities::Click;
use crate::domain::repositories::DailyCount;

/// Click count for one calendar day.
#[derive(Debug, Serialize)]
pub struct DailyClicksDto {
    pub date: NaiveDate,
    pub count: i64,
}

impl From<DailyCount> for DailyClicksDto {
    fn from(c: DailyCount) -> Self {
        Self {
            date: c.day,
            count: c.count,
        }
    }
}

/// One recorded click with its derived metadata.
#[derive(Debug, Serialize)]
pub struct ClickDto {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub country: Option<String>,
    pub device_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Click> for ClickDto {
    fn from(c: Click) -> Self {
        Self {
            ip_address: c.ip_address,
            user_agent: c.user_agent,
            referer: c.referer,
            country: c.country,
            device_type: c.device_type,
            created_at: c.created_at,
        }
    }
}

/// Response for the per-link statistics endpoint.
#[derive(Debug, Serialize)]
pub struct UrlStatsResponse {
    pub url: UrlResponse,
    /// True row count from the analytics table.
    pub total_clicks: i64,
    pub clicks_over_time: Vec<DailyClicksDto>,
    pub recent_clicks: Vec<ClickDto>,
}
