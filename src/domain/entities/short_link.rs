//! Short link entity: a user-owned mapping from a short code to a URL.

use chrono::{DateTime, Utc};

/// A stored short link with its denormalized click counter.
///
/// `click_count` is bumped on each redirect and may lag the true
/// `url_clicks` row count under concurrent redirects; per-link statistics
/// report aggregates from the clicks table instead.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ShortLink {
    pub id: i64,
    pub user_id: i64,
    pub original_url: String,
    pub short_code: String,
    pub title: Option<String>,
    pub click_count: i64,
    pub last_clicked_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ShortLink {
    /// Returns true if the link has passed its expiry time.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|e| Utc::now() >= e)
    }

    /// Returns true if a redirect for this link would currently succeed.
    pub fn is_resolvable(&self) -> bool {
        self.is_active && !self.is_expired()
    }
}

/// Input data for creating a new short link.
#[derive(Debug, Clone)]
pub struct NewShortLink {
    pub user_id: i64,
    pub original_url: String,
    pub short_code: String,
    pub title: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}
