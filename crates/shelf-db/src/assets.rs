//! Asset repository
//!
//! Aggregate queries backing the dashboard.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::PgPool;

use crate::repository::RepositoryResult;

#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Number of assets owned by the user
    async fn count_for_user(&self, user_id: &str) -> RepositoryResult<i64>;

    /// Number of assets the user created strictly before `before`
    async fn count_created_before(
        &self,
        user_id: &str,
        before: DateTime<Utc>,
    ) -> RepositoryResult<i64>;

    /// Creation times of the user's assets created at or after `since`, oldest first
    async fn creation_dates_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> RepositoryResult<Vec<DateTime<Utc>>>;
}

/// Asset repository implementation
pub struct AssetRepository {
    pool: PgPool,
}

impl AssetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssetStore for AssetRepository {
    async fn count_for_user(&self, user_id: &str) -> RepositoryResult<i64> {
        let count =
            sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM "Asset" WHERE "userId" = $1"#)
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    async fn count_created_before(
        &self,
        user_id: &str,
        before: DateTime<Utc>,
    ) -> RepositoryResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM "Asset" WHERE "userId" = $1 AND "createdAt" < $2"#,
        )
        .bind(user_id)
        .bind(before.naive_utc())
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn creation_dates_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> RepositoryResult<Vec<DateTime<Utc>>> {
        let rows = sqlx::query_scalar::<_, NaiveDateTime>(
            r#"
            SELECT "createdAt"
            FROM "Asset"
            WHERE "userId" = $1 AND "createdAt" >= $2
            ORDER BY "createdAt" ASC
            "#,
        )
        .bind(user_id)
        .bind(since.naive_utc())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|t| t.and_utc()).collect())
    }
}
