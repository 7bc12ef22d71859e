//! PostgreSQL implementation of the generation counter.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::repositories::CounterRepository;
use crate::error::AppError;

/// Single-row counter table; the increment is one atomic `UPDATE ... RETURNING`.
pub struct PgCounterRepository {
    pool: Arc<PgPool>,
}

impl PgCounterRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CounterRepository for PgCounterRepository {
    async fn increment(&self) -> Result<u64, AppError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO generation_counter (id, count) VALUES (1, 1)
            ON CONFLICT (id) DO UPDATE SET count = generation_counter.count + 1
            RETURNING count
            "#,
        )
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count.max(0) as u64)
    }

    async fn current(&self) -> Result<u64, AppError> {
        let count: Option<i64> =
            sqlx::query_scalar("SELECT count FROM generation_counter WHERE id = 1")
                .fetch_optional(self.pool.as_ref())
                .await?;

        Ok(count.unwrap_or(0).max(0) as u64)
    }
}
