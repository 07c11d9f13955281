//! Link creation, resolution and lifecycle service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::page_title::TitleProber;
use crate::utils::code_generator::{generate_code, validate_custom_code};
use crate::utils::url_validator::validate_target_url;

/// Input for creating a short link.
#[derive(Debug, Clone)]
pub struct CreateLink {
    pub original_url: String,
    pub title: Option<String>,
    pub custom_code: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Service for creating, resolving and deleting short links.
pub struct LinkService {
    links: Arc<dyn LinkRepository>,
    titles: Arc<dyn TitleProber>,
    base_url: String,
}

impl LinkService {
    pub fn new(
        links: Arc<dyn LinkRepository>,
        titles: Arc<dyn TitleProber>,
        base_url: String,
    ) -> Self {
        Self {
            links,
            titles,
            base_url,
        }
    }

    /// Creates a short link for a user.
    ///
    /// # Code Selection
    ///
    /// - A custom code is validated for format and reserved words, then
    ///   checked for uniqueness; a taken code fails with a conflict, never
    ///   a retry.
    /// - Otherwise a random 6-character code is drawn, re-drawing on
    ///   collision until a free one is found.
    ///
    /// # Title Enrichment
    ///
    /// When no title is supplied, the target page's `<title>` is probed
    /// best-effort; failures leave the title empty.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a malformed or oversized URL or
    /// an invalid custom code, [`AppError::Conflict`] for a taken custom
    /// code.
    pub async fn create_link(&self, user_id: i64, input: CreateLink) -> Result<ShortLink, AppError> {
        validate_target_url(&input.original_url).map_err(|e| {
            AppError::bad_request("Invalid URL", json!({ "reason": e.to_string() }))
        })?;

        let short_code = match input.custom_code {
            Some(custom) => {
                validate_custom_code(&custom)?;

                if self.links.code_exists(&custom).await? {
                    return Err(AppError::conflict(
                        "Custom code already exists",
                        json!({ "code": custom }),
                    ));
                }

                custom
            }
            None => self.generate_unique_code().await?,
        };

        let title = match input.title {
            Some(title) => Some(title),
            None => self.titles.probe_title(&input.original_url).await,
        };

        self.links
            .create(NewShortLink {
                user_id,
                original_url: input.original_url,
                short_code,
                title,
                expires_at: input.expires_at,
            })
            .await
    }

    /// Resolves a short code to its link for redirecting.
    ///
    /// Only active, unexpired links resolve; anything else is reported as
    /// not found so callers cannot distinguish disabled from unknown codes.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] when the code is unknown, inactive or
    /// expired.
    pub async fn resolve(&self, code: &str) -> Result<ShortLink, AppError> {
        self.links.find_resolvable(code).await?.ok_or_else(|| {
            AppError::not_found("Short link not found or expired", json!({ "code": code }))
        })
    }

    /// Lists a user's links, newest first.
    pub async fn list_links(&self, user_id: i64) -> Result<Vec<ShortLink>, AppError> {
        self.links.list_by_user(user_id).await
    }

    /// Fetches a link and verifies ownership.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for an unknown id and
    /// [`AppError::Forbidden`] when the link belongs to another user.
    pub async fn get_owned(&self, user_id: i64, id: i64) -> Result<ShortLink, AppError> {
        let link = self
            .links
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "id": id })))?;

        if link.user_id != user_id {
            return Err(AppError::forbidden(
                "You do not own this link",
                json!({ "id": id }),
            ));
        }

        Ok(link)
    }

    /// Deletes a user's link; click events go with it via the FK cascade.
    pub async fn delete_link(&self, user_id: i64, id: i64) -> Result<(), AppError> {
        let link = self.get_owned(user_id, id).await?;
        self.links.delete(link.id).await?;
        Ok(())
    }

    /// Constructs the public short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), code)
    }

    /// Verifies database connectivity for the health endpoint.
    pub async fn health_check(&self) -> Result<(), AppError> {
        self.links.ping().await
    }

    /// Draws random codes until one is free.
    ///
    /// The 62^6 code space dwarfs expected volume, so collisions are rare
    /// and the loop terminates quickly in practice.
    async fn generate_unique_code(&self) -> Result<String, AppError> {
        loop {
            let code = generate_code();

            if !self.links.code_exists(&code).await? {
                return Ok(code);
            }
        }
    }
}
