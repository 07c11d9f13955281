//! Repository trait for short link data access.

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Per-user aggregate over the `urls` table.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkTotals {
    pub total_urls: i64,
    /// Sum of the denormalized per-link click counters.
    pub total_clicks: i64,
    /// Links that are active and not past their expiry.
    pub active_urls: i64,
}

/// Repository interface for managing short links.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Creates a new short link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short code is already taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError>;

    /// Finds a link that is currently resolvable: active and either without
    /// expiry or expiring in the future. The filter runs in SQL so expired
    /// links never leave the database.
    async fn find_resolvable(&self, code: &str) -> Result<Option<ShortLink>, AppError>;

    /// Finds a link by its identifier.
    async fn find_by_id(&self, id: i64) -> Result<Option<ShortLink>, AppError>;

    /// Returns true when a short code is already in use.
    async fn code_exists(&self, code: &str) -> Result<bool, AppError>;

    /// Lists a user's links, newest first.
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<ShortLink>, AppError>;

    /// Lists a user's most recently created links.
    async fn recent_by_user(&self, user_id: i64, limit: i64) -> Result<Vec<ShortLink>, AppError>;

    /// Deletes a link. Click events are removed by the foreign-key cascade.
    ///
    /// Returns `Ok(true)` when a row was deleted.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    /// Bumps the denormalized click counter and last-click timestamp.
    ///
    /// A single-row `UPDATE`; not serialized against concurrent click
    /// inserts, which is accepted for the counter.
    async fn register_click(&self, id: i64) -> Result<(), AppError>;

    /// Computes per-user link totals for the dashboard.
    async fn totals_by_user(&self, user_id: i64) -> Result<LinkTotals, AppError>;

    /// Verifies database connectivity for health checks.
    async fn ping(&self) -> Result<(), AppError>;
}
