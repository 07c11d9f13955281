//! DTOs for link management endpoints.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::Validate;

use crate::domain::entities::ShortLink;

/// Compiled regex for custom code validation.
static CUSTOM_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]+$").unwrap());

/// Request to create a short link.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUrlRequest {
    /// The target URL (must be valid HTTP/HTTPS).
    #[validate(url(message = "Invalid URL format"))]
    #[validate(length(max = 2048, message = "URL must not exceed 2048 characters"))]
    pub url: String,

    /// Optional display title. When omitted, the target page's title is
    /// probed best-effort.
    #[validate(length(max = 255))]
    pub title: Option<String>,

    /// Optional custom short code (3-20 alphanumeric characters).
    #[validate(length(min = 3, max = 20))]
    #[validate(regex(path = "*CUSTOM_CODE_REGEX"))]
    pub custom_code: Option<String>,

    /// Optional expiry; after this instant the code stops resolving.
    pub expires_at: Option<DateTime<Utc>>,
}

/// A short link as returned by the API.
#[derive(Debug, Serialize)]
pub struct UrlResponse {
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    pub short_url: String,
    pub title: Option<String>,
    pub click_count: i64,
    pub is_active: bool,
    pub last_clicked_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl UrlResponse {
    pub fn from_link(link: ShortLink, short_url: String) -> Self {
        Self {
            id: link.id,
            original_url: link.original_url,
            short_code: link.short_code,
            short_url,
            title: link.title,
            click_count: link.click_count,
            is_active: link.is_active,
            last_clicked_at: link.last_clicked_at,
            expires_at: link.expires_at,
            created_at: link.created_at,
        }
    }
}

/// Response for the link listing endpoint.
#[derive(Debug, Serialize)]
pub struct UrlListResponse {
    pub urls: Vec<UrlResponse>,
}
