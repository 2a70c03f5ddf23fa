use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    db::error::DbResult,
    models::{CreateSubmission, Submission, SubmissionId},
};

#[async_trait]
pub trait SubmissionRepo: Send + Sync {
    /// Record a submission along with its field values.
    async fn create(&self, input: CreateSubmission) -> DbResult<Submission>;

    /// Total number of submissions stored for a form.
    async fn count(&self, form_id: &str) -> DbResult<i64>;

    // ==================== Purge Operations ====================

    /// Ids of a form's submissions created strictly before `cutoff`, ascending.
    ///
    /// `draft_filter` of `Some(true)` keeps drafts only, `Some(false)`
    /// completed submissions only, `None` both.
    async fn query_ids(
        &self,
        form_id: &str,
        cutoff: DateTime<Utc>,
        draft_filter: Option<bool>,
    ) -> DbResult<Vec<SubmissionId>>;

    /// Load submissions by id. Ids that no longer exist are omitted.
    async fn load_many(&self, ids: &[SubmissionId]) -> DbResult<Vec<Submission>>;

    /// Delete a single submission and everything it owns, atomically.
    async fn delete(&self, submission: &Submission) -> DbResult<()>;
}
