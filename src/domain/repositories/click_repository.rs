//! Repository trait for click recording and analytics queries.

use crate::domain::entities::{Click, NewClick};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

/// Click count for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct DailyCount {
    pub day: NaiveDate,
    pub count: i64,
}

/// Repository interface for the append-only click store.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgClickRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickRepository: Send + Sync {
    /// Records one click inside a transaction scoped to the insert.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors; callers on the
    /// redirect path swallow and log these.
    async fn record(&self, new_click: NewClick) -> Result<Click, AppError>;

    /// Counts a user's clicks since the given instant (across all links).
    async fn count_since(&self, user_id: i64, from: DateTime<Utc>) -> Result<i64, AppError>;

    /// Counts all clicks for a single link.
    async fn count_by_link(&self, url_id: i64) -> Result<i64, AppError>;

    /// Per-day click counts for a user's links since the given instant,
    /// chronologically ordered. Days with no clicks are absent; the
    /// aggregation layer zero-fills them.
    async fn daily_counts_by_user(
        &self,
        user_id: i64,
        from: DateTime<Utc>,
    ) -> Result<Vec<DailyCount>, AppError>;

    /// Per-day click counts for a single link over its whole lifetime.
    async fn daily_counts_by_link(&self, url_id: i64) -> Result<Vec<DailyCount>, AppError>;

    /// A link's most recent clicks, newest first.
    async fn recent_by_link(&self, url_id: i64, limit: i64) -> Result<Vec<Click>, AppError>;
}
