//! Drives a [`PurgeJob`] to completion.

use super::{ProgressReporter, PurgeError, PurgeJob, PurgeLease};
use crate::db::SubmissionRepo;

/// Run every remaining chunk of `job`, then report the final status.
///
/// With a `lease`, the lock is renewed before each chunk and the run stops
/// if another run has taken it over. Returns the completed job. Per-item
/// failures are on the job; an `Err` means the run itself aborted, which is
/// reported as unsuccessful.
pub async fn run_to_completion(
    mut job: PurgeJob,
    submissions: &dyn SubmissionRepo,
    reporter: &dyn ProgressReporter,
    lease: Option<&PurgeLease>,
) -> Result<PurgeJob, PurgeError> {
    tracing::info!(
        total = job.total(),
        chunk_size = job.chunk_size(),
        chunks = job.chunk_count(),
        "Clearing submission data"
    );

    while !job.is_complete() {
        let checkpoint = job.summary();
        let advanced = match lease {
            Some(lease) => match lease.renew().await {
                Ok(()) => job.step(submissions, reporter).await,
                Err(e) => Err(e),
            },
            None => job.step(submissions, reporter).await,
        };
        job = match advanced {
            Ok(next) => next,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    processed = checkpoint.processed,
                    total = checkpoint.total,
                    "The submissions could not be cleared because an error occurred"
                );
                reporter.finished(false, &checkpoint);
                return Err(e);
            }
        };
    }

    reporter.finished(true, &job.summary());
    Ok(job)
}
