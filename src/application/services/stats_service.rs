//! Dashboard metrics and per-link analytics aggregation.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};

use crate::domain::entities::{Click, ShortLink};
use crate::domain::repositories::{ClickRepository, DailyCount, LinkRepository};
use crate::error::AppError;

/// Number of days covered by the dashboard time series.
const SERIES_DAYS: i64 = 30;

/// Number of recent links shown on the dashboard.
const RECENT_LINKS_LIMIT: i64 = 10;

/// Number of recent clicks shown in per-link stats.
const RECENT_CLICKS_LIMIT: i64 = 10;

/// Headline numbers for a user's dashboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashboardMetrics {
    pub total_urls: i64,
    pub total_clicks: i64,
    /// Average clicks per URL, rounded to 2 decimals; 0 for users without
    /// links.
    pub click_through_rate: f64,
    pub active_urls: i64,
    pub clicks_today: i64,
    pub clicks_this_week: i64,
}

/// Everything the dashboard endpoint renders.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub metrics: DashboardMetrics,
    pub recent_links: Vec<ShortLink>,
    /// Exactly [`SERIES_DAYS`] entries, chronological, zero-filled.
    pub daily_series: Vec<DailyCount>,
}

/// Analytics for one link; ownership is checked by the caller.
#[derive(Debug, Clone)]
pub struct LinkStatsReport {
    /// True row count from the clicks table, not the denormalized counter.
    pub total_clicks: i64,
    pub daily_series: Vec<DailyCount>,
    pub recent_clicks: Vec<Click>,
}

/// Service computing dashboard summaries and per-link statistics.
pub struct StatsService {
    links: Arc<dyn LinkRepository>,
    clicks: Arc<dyn ClickRepository>,
}

impl StatsService {
    pub fn new(links: Arc<dyn LinkRepository>, clicks: Arc<dyn ClickRepository>) -> Self {
        Self { links, clicks }
    }

    /// Assembles the dashboard for a user.
    ///
    /// Calendar boundaries are computed in UTC; the week starts Monday.
    pub async fn dashboard(&self, user_id: i64) -> Result<Dashboard, AppError> {
        let today = Utc::now().date_naive();
        let today_start = day_start(today);
        let week_start = day_start(today - Duration::days(today.weekday().num_days_from_monday() as i64));
        let series_start = day_start(today - Duration::days(SERIES_DAYS - 1));

        let totals = self.links.totals_by_user(user_id).await?;
        let clicks_today = self.clicks.count_since(user_id, today_start).await?;
        let clicks_this_week = self.clicks.count_since(user_id, week_start).await?;
        let recent_links = self.links.recent_by_user(user_id, RECENT_LINKS_LIMIT).await?;
        let raw_series = self
            .clicks
            .daily_counts_by_user(user_id, series_start)
            .await?;

        Ok(Dashboard {
            metrics: DashboardMetrics {
                total_urls: totals.total_urls,
                total_clicks: totals.total_clicks,
                click_through_rate: click_through_rate(totals.total_clicks, totals.total_urls),
                active_urls: totals.active_urls,
                clicks_today,
                clicks_this_week,
            },
            recent_links,
            daily_series: fill_daily_series(&raw_series, today),
        })
    }

    /// Computes analytics for a single link.
    pub async fn link_stats(&self, link: &ShortLink) -> Result<LinkStatsReport, AppError> {
        let total_clicks = self.clicks.count_by_link(link.id).await?;
        let daily_series = self.clicks.daily_counts_by_link(link.id).await?;
        let recent_clicks = self
            .clicks
            .recent_by_link(link.id, RECENT_CLICKS_LIMIT)
            .await?;

        Ok(LinkStatsReport {
            total_clicks,
            daily_series,
            recent_clicks,
        })
    }
}

/// Average clicks per URL, rounded to 2 decimals.
///
/// Guards against division by zero and non-finite intermediate values;
/// both collapse to 0.
fn click_through_rate(total_clicks: i64, total_urls: i64) -> f64 {
    if total_urls == 0 {
        return 0.0;
    }

    let rate = total_clicks as f64 / total_urls as f64;
    if rate.is_finite() {
        (rate * 100.0).round() / 100.0
    } else {
        0.0
    }
}

/// Expands sparse per-day counts into a dense series ending today.
///
/// The result always holds exactly [`SERIES_DAYS`] entries in chronological
/// order; days absent from `counts` get a zero count.
fn fill_daily_series(counts: &[DailyCount], today: NaiveDate) -> Vec<DailyCount> {
    let by_day: HashMap<NaiveDate, i64> = counts.iter().map(|c| (c.day, c.count)).collect();

    (0..SERIES_DAYS)
        .map(|offset| {
            let day = today - Duration::days(SERIES_DAYS - 1 - offset);
            DailyCount {
                day,
                count: by_day.get(&day).copied().unwrap_or(0),
            }
        })
        .collect()
}

fn day_start(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}
