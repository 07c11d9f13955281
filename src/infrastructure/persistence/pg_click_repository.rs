//! PostgreSQL implementation of the click repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Click, NewClick};
use crate::domain::repositories::{ClickRepository, DailyCount};
use crate::error::AppError;

const CLICK_COLUMNS: &str =
    "id, url_id, ip_address, user_agent, referer, country, device_type, created_at";

/// PostgreSQL repository for the append-only `url_clicks` table.
pub struct PgClickRepository {
    pool: Arc<PgPool>,
}

impl PgClickRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClickRepository for PgClickRepository {
    async fn record(&self, new_click: NewClick) -> Result<Click, AppError> {
        // One transaction per insert; the click counter on `urls` is bumped
        // separately and deliberately not part of it.
        let mut tx = self.pool.begin().await?;

        let click = sqlx::query_as::<_, Click>(&format!(
            "INSERT INTO url_clicks
                (url_id, ip_address, user_agent, referer, country, device_type)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {CLICK_COLUMNS}"
        ))
        .bind(new_click.url_id)
        .bind(&new_click.ip_address)
        .bind(&new_click.user_agent)
        .bind(&new_click.referer)
        .bind(&new_click.country)
        .bind(&new_click.device_type)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(click)
    }

    async fn count_since(&self, user_id: i64, from: DateTime<Utc>) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*)
             FROM url_clicks uc
             JOIN urls u ON u.id = uc.url_id
             WHERE u.user_id = $1 AND uc.created_at >= $2",
        )
        .bind(user_id)
        .bind(from)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn count_by_link(&self, url_id: i64) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM url_clicks WHERE url_id = $1")
            .bind(url_id)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn daily_counts_by_user(
        &self,
        user_id: i64,
        from: DateTime<Utc>,
    ) -> Result<Vec<DailyCount>, AppError> {
        let rows = sqlx::query_as::<_, DailyCount>(
            "SELECT uc.created_at::date AS day, COUNT(*)::bigint AS count
             FROM url_clicks uc
             JOIN urls u ON u.id = uc.url_id
             WHERE u.user_id = $1 AND uc.created_at >= $2
             GROUP BY day
             ORDER BY day",
        )
        .bind(user_id)
        .bind(from)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows)
    }

    async fn daily_counts_by_link(&self, url_id: i64) -> Result<Vec<DailyCount>, AppError> {
        let rows = sqlx::query_as::<_, DailyCount>(
            "SELECT created_at::date AS day, COUNT(*)::bigint AS count
             FROM url_clicks
             WHERE url_id = $1
             GROUP BY day
             ORDER BY day",
        )
        .bind(url_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows)
    }

    async fn recent_by_link(&self, url_id: i64, limit: i64) -> Result<Vec<Click>, AppError> {
        let clicks = sqlx::query_as::<_, Click>(&format!(
            "SELECT {CLICK_COLUMNS} FROM url_clicks
             WHERE url_id = $1
             ORDER BY created_at DESC
             LIMIT $2"
        ))
        .bind(url_id)
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(clicks)
    }
}
