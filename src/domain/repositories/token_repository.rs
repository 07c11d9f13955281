//! Repository trait for API token authentication.

use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// API token entity with metadata.
///
/// Only the HMAC-SHA256 hash of a token is stored; the raw token is shown
/// once at creation time and cannot be recovered.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ApiToken {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub revoked_at: Option<DateTime<Utc>>,
}

/// Repository interface for API token management.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgTokenRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Finds a non-revoked token by its hash.
    ///
    /// Returns `Ok(None)` for unknown or revoked tokens.
    async fn find_valid(&self, token_hash: &str) -> Result<Option<ApiToken>, AppError>;

    /// Updates the last-used timestamp for a token. Best-effort; callers
    /// ignore failures.
    async fn touch_last_used(&self, token_hash: &str) -> Result<(), AppError>;

    /// Stores a new token hash for a user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the token name is taken.
    async fn create(&self, user_id: i64, name: &str, token_hash: &str)
    -> Result<ApiToken, AppError>;

    /// Lists all tokens, newest first.
    async fn list(&self) -> Result<Vec<ApiToken>, AppError>;

    /// Revokes a token by name.
    ///
    /// Returns `Ok(true)` when a token was revoked, `Ok(false)` when no
    /// active token matched.
    async fn revoke(&self, name: &str) -> Result<bool, AppError>;
}
