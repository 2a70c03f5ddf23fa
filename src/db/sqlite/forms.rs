use async_trait::async_trait;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use super::common::parse_purge_mode;
use crate::{
    db::{
        error::{DbError, DbResult},
        repos::FormRepo,
    },
    models::{CreateForm, Form},
};

pub struct SqliteFormRepo {
    pool: SqlitePool,
}

impl SqliteFormRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn form_from_row(row: &SqliteRow) -> DbResult<Form> {
        let purge_days: i64 = row.get("purge_days");
        Ok(Form {
            id: row.get("id"),
            label: row.get("label"),
            purge_mode: parse_purge_mode(&row.get::<String, _>("purge_mode"))?,
            purge_days: u32::try_from(purge_days).map_err(|_| {
                DbError::Internal(format!("Invalid purge_days in database: {}", purge_days))
            })?,
        })
    }
}

#[async_trait]
impl FormRepo for SqliteFormRepo {
    async fn create(&self, input: CreateForm) -> DbResult<Form> {
        if input.id.is_empty() {
            return Err(DbError::Validation("Form id cannot be empty".into()));
        }

        sqlx::query(
            r#"
            INSERT INTO forms (id, label, purge_mode, purge_days, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&input.id)
        .bind(&input.label)
        .bind(input.purge_mode.to_string())
        .bind(i64::from(input.purge_days))
        .bind(chrono::Utc::now().timestamp())
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                DbError::FormExists(input.id.clone())
            }
            _ => DbError::from(e),
        })?;

        Ok(Form {
            id: input.id,
            label: input.label,
            purge_mode: input.purge_mode,
            purge_days: input.purge_days,
        })
    }

    async fn get(&self, id: &str) -> DbResult<Option<Form>> {
        let row = sqlx::query(
            r#"
            SELECT id, label, purge_mode, purge_days
            FROM forms
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::form_from_row).transpose()
    }

    async fn find_eligible(
        &self,
        id: &str,
        has_mode_override: bool,
        has_days_override: bool,
    ) -> DbResult<Option<Form>> {
        let mut query = String::from(
            "SELECT id, label, purge_mode, purge_days FROM forms WHERE id = ?",
        );
        if !has_mode_override {
            query.push_str(" AND purge_mode IN ('draft', 'completed', 'all')");
        }
        if !has_days_override {
            query.push_str(" AND purge_days > 0");
        }

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::form_from_row).transpose()
    }
}
