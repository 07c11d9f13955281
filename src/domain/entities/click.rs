//! Click entity: one recorded visit to a short link.

use chrono::{DateTime, Utc};

/// A persisted click with the metadata derived from the request.
///
/// Rows are append-only; they are removed only by cascade when the owning
/// link is deleted.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Click {
    pub id: i64,
    pub url_id: i64,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    /// ISO 3166-1 alpha-2 country code, best-effort.
    pub country: Option<String>,
    /// Coarse device label: mobile, tablet, bot, desktop or unknown.
    pub device_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input data for recording a click.
#[derive(Debug, Clone)]
pub struct NewClick {
    pub url_id: i64,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub country: Option<String>,
    pub device_type: Option<String>,
}
