use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use super::common::{MAX_BIND_PARAMS, from_unix, placeholders};
use crate::{
    db::{
        error::{DbError, DbResult},
        repos::SubmissionRepo,
    },
    models::{CreateSubmission, Submission, SubmissionId},
};

pub struct SqliteSubmissionRepo {
    pool: SqlitePool,
}

impl SqliteSubmissionRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubmissionRepo for SqliteSubmissionRepo {
    async fn create(&self, input: CreateSubmission) -> DbResult<Submission> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO submissions (form_id, created_at, is_draft)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&input.form_id)
        .bind(input.created_at.timestamp())
        .bind(input.is_draft)
        .execute(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                DbError::Validation(format!("Form '{}' does not exist", input.form_id))
            }
            _ => DbError::from(e),
        })?;
        let id = result.last_insert_rowid();

        for (name, value) in &input.data {
            sqlx::query(
                r#"
                INSERT INTO submission_data (submission_id, name, value)
                VALUES (?, ?, ?)
                "#,
            )
            .bind(id)
            .bind(name)
            .bind(value)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(Submission {
            id,
            form_id: input.form_id,
            created_at: from_unix(input.created_at.timestamp())?,
            is_draft: input.is_draft,
        })
    }

    async fn count(&self, form_id: &str) -> DbResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM submissions WHERE form_id = ?")
            .bind(form_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("total"))
    }

    async fn query_ids(
        &self,
        form_id: &str,
        cutoff: DateTime<Utc>,
        draft_filter: Option<bool>,
    ) -> DbResult<Vec<SubmissionId>> {
        let mut query =
            String::from("SELECT id FROM submissions WHERE form_id = ? AND created_at < ?");
        if draft_filter.is_some() {
            query.push_str(" AND is_draft = ?");
        }
        query.push_str(" ORDER BY id");

        // Stored times are whole seconds. A fractional cutoff rounds up so
        // the second it falls in still counts as older.
        let cutoff_secs = if cutoff.timestamp_subsec_nanos() > 0 {
            cutoff.timestamp().saturating_add(1)
        } else {
            cutoff.timestamp()
        };

        let mut q = sqlx::query_scalar::<_, i64>(&query)
            .bind(form_id)
            .bind(cutoff_secs);
        if let Some(is_draft) = draft_filter {
            q = q.bind(is_draft);
        }

        Ok(q.fetch_all(&self.pool).await?)
    }

    async fn load_many(&self, ids: &[SubmissionId]) -> DbResult<Vec<Submission>> {
        let mut submissions = Vec::with_capacity(ids.len());

        for batch in ids.chunks(MAX_BIND_PARAMS) {
            let query = format!(
                r#"
                SELECT id, form_id, created_at, is_draft
                FROM submissions
                WHERE id IN ({})
                ORDER BY id
                "#,
                placeholders(batch.len())
            );

            let mut query_builder = sqlx::query(&query);
            for id in batch {
                query_builder = query_builder.bind(id);
            }

            for row in query_builder.fetch_all(&self.pool).await? {
                submissions.push(Submission {
                    id: row.get("id"),
                    form_id: row.get("form_id"),
                    created_at: from_unix(row.get("created_at"))?,
                    is_draft: row.get("is_draft"),
                });
            }
        }

        Ok(submissions)
    }

    async fn delete(&self, submission: &Submission) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM submission_data WHERE submission_id = ?")
            .bind(submission.id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM submissions WHERE id = ?")
            .bind(submission.id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::SubmissionNotFound(submission.id));
        }

        tx.commit().await?;
        Ok(())
    }
}
