//! PostgreSQL implementation of the redirect repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewRedirect, RedirectRecord};
use crate::domain::repositories::RedirectRepository;
use crate::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct RedirectRow {
    code: String,
    destination_url: String,
    display_name: String,
    filename: String,
    created_at: DateTime<Utc>,
}

impl From<RedirectRow> for RedirectRecord {
    fn from(r: RedirectRow) -> Self {
        RedirectRecord::new(
            r.code,
            r.destination_url,
            r.display_name,
            r.filename,
            r.created_at,
        )
    }
}

/// PostgreSQL repository for redirect records.
///
/// Inserts rely on `ON CONFLICT (code) DO NOTHING`, so the primary key is the
/// only arbiter of uniqueness and no application lock is needed.
pub struct PgRedirectRepository {
    pool: Arc<PgPool>,
}

impl PgRedirectRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RedirectRepository for PgRedirectRepository {
    async fn exists(&self, code: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM redirects WHERE code = $1)")
                .bind(code)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(exists)
    }

    async fn insert(&self, new_redirect: NewRedirect) -> Result<RedirectRecord, AppError> {
        let row: Option<RedirectRow> = sqlx::query_as(
            r#"
            INSERT INTO redirects (code, destination_url, display_name, filename, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (code) DO NOTHING
            RETURNING code, destination_url, display_name, filename, created_at
            "#,
        )
        .bind(&new_redirect.code)
        .bind(&new_redirect.destination_url)
        .bind(&new_redirect.display_name)
        .bind(&new_redirect.filename)
        .bind(new_redirect.created_at)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(RedirectRecord::from)
            .ok_or_else(|| AppError::duplicate_code(&new_redirect.code))
    }

    async fn lookup(&self, code: &str) -> Result<Option<RedirectRecord>, AppError> {
        let row: Option<RedirectRow> = sqlx::query_as(
            r#"
            SELECT code, destination_url, display_name, filename, created_at
            FROM redirects
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(RedirectRecord::from))
    }

    async fn list_recent(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<RedirectRecord>, AppError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let offset = i64::try_from(offset).unwrap_or(i64::MAX);

        let rows: Vec<RedirectRow> = sqlx::query_as(
            r#"
            SELECT code, destination_url, display_name, filename, created_at
            FROM redirects
            ORDER BY created_at DESC, code ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(RedirectRecord::from).collect())
    }

    async fn count(&self) -> Result<u64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM redirects")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count.max(0) as u64)
    }

    async fn prune_created_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<RedirectRecord>, AppError> {
        let rows: Vec<RedirectRow> = sqlx::query_as(
            r#"
            DELETE FROM redirects
            WHERE created_at < $1
            RETURNING code, destination_url, display_name, filename, created_at
            "#,
        )
        .bind(cutoff)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(RedirectRecord::from).collect())
    }
}
