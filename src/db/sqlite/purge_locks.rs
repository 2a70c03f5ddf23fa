use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::db::{error::DbResult, repos::PurgeLockRepo};

pub struct SqlitePurgeLockRepo {
    pool: SqlitePool,
}

impl SqlitePurgeLockRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PurgeLockRepo for SqlitePurgeLockRepo {
    async fn acquire(
        &self,
        form_id: &str,
        holder: &str,
        now: DateTime<Utc>,
        stale_before: DateTime<Utc>,
    ) -> DbResult<bool> {
        // Single statement: either inserts a fresh lock or takes over a stale one.
        let result = sqlx::query(
            r#"
            INSERT INTO purge_locks (form_id, holder, acquired_at)
            VALUES (?, ?, ?)
            ON CONFLICT (form_id) DO UPDATE
                SET holder = excluded.holder, acquired_at = excluded.acquired_at
                WHERE purge_locks.acquired_at < ?
            "#,
        )
        .bind(form_id)
        .bind(holder)
        .bind(now.timestamp())
        .bind(stale_before.timestamp())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn refresh(&self, form_id: &str, holder: &str, now: DateTime<Utc>) -> DbResult<bool> {
        let result = sqlx::query(
            "UPDATE purge_locks SET acquired_at = ? WHERE form_id = ? AND holder = ?",
        )
        .bind(now.timestamp())
        .bind(form_id)
        .bind(holder)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn release(&self, form_id: &str, holder: &str) -> DbResult<()> {
        sqlx::query("DELETE FROM purge_locks WHERE form_id = ? AND holder = ?")
            .bind(form_id)
            .bind(holder)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
