//! Authentication service for API token validation.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;

use crate::domain::repositories::{ApiToken, TokenRepository, UserRepository};
use crate::error::AppError;
use serde_json::json;

type HmacSha256 = Hmac<Sha256>;

/// Length in bytes of a freshly issued raw token.
const TOKEN_BYTES: usize = 32;

/// The authenticated principal attached to a request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub username: String,
}

/// Service for authenticating requests via bearer tokens.
///
/// Tokens are hashed with HMAC-SHA256 (keyed by `signing_secret`) before
/// storage and comparison, so read-only database access is not enough to
/// forge or verify a token.
pub struct AuthService {
    tokens: Arc<dyn TokenRepository>,
    users: Arc<dyn UserRepository>,
    signing_secret: String,
}

impl AuthService {
    pub fn new(
        tokens: Arc<dyn TokenRepository>,
        users: Arc<dyn UserRepository>,
        signing_secret: String,
    ) -> Self {
        Self {
            tokens,
            users,
            signing_secret,
        }
    }

    /// Hashes a raw token with HMAC-SHA256 using the server signing secret.
    ///
    /// Returns a 64-character lowercase hex-encoded MAC.
    fn hash_token(&self, token: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.signing_secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(token.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Authenticates a raw token and resolves its owning user.
    ///
    /// On success the token's `last_used_at` is touched best-effort.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] for unknown or revoked tokens and
    /// for tokens whose user no longer exists.
    pub async fn authenticate(&self, token: &str) -> Result<AuthUser, AppError> {
        let token_hash = self.hash_token(token);

        let stored = self
            .tokens
            .find_valid(&token_hash)
            .await?
            .ok_or_else(|| {
                AppError::unauthorized(
                    "Unauthorized",
                    json!({ "reason": "Invalid or revoked token" }),
                )
            })?;

        let user = self
            .users
            .find_by_id(stored.user_id)
            .await?
            .ok_or_else(|| {
                AppError::unauthorized("Unauthorized", json!({ "reason": "Unknown user" }))
            })?;

        let _ = self.tokens.touch_last_used(&token_hash).await;

        Ok(AuthUser {
            user_id: user.id,
            username: user.username,
        })
    }

    /// Issues a new token for a user.
    ///
    /// Returns the raw token (shown once, never stored) together with the
    /// persisted metadata. Used by the admin CLI.
    pub async fn issue_token(
        &self,
        user_id: i64,
        name: &str,
    ) -> Result<(String, ApiToken), AppError> {
        let mut raw = [0u8; TOKEN_BYTES];
        getrandom::fill(&mut raw).expect("Failed to generate random bytes");
        let raw_token = hex::encode(raw);

        let token_hash = self.hash_token(&raw_token);
        let stored = self.tokens.create(user_id, name, &token_hash).await?;

        Ok((raw_token, stored))
    }
}
