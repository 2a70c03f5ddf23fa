use thiserror::Error;

use crate::models::SubmissionId;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database not configured")]
    NotConfigured,

    #[error("Form '{0}' already exists")]
    FormExists(String),

    /// The row was already gone when a delete reached it.
    #[error("Submission {0} not found")]
    SubmissionNotFound(SubmissionId),

    /// Input rejected before it reached the database.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored value that does not decode, e.g. an out-of-range timestamp.
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type DbResult<T> = Result<T, DbError>;
