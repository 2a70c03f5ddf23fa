use thiserror::Error;

use crate::db::DbError;

/// Job-level purge failures.
///
/// Per-submission delete failures never show up here; they are recorded on
/// the job and reported in aggregate once it completes.
#[derive(Debug, Error)]
pub enum PurgeError {
    #[error("Form '{0}' not found or not eligible for purge settings")]
    FormNotEligible(String),

    #[error("No submissions to purge for form '{0}'")]
    NoCandidates(String),

    #[error("Purge aborted by user")]
    UserAborted,

    #[error("Another purge of form '{0}' is already running")]
    PurgeInProgress(String),

    #[error("Purge lock for form '{0}' was taken over by another run")]
    LockLost(String),

    #[error("Confirmation prompt failed: {0}")]
    Prompt(String),

    #[error(transparent)]
    Db(#[from] DbError),
}
