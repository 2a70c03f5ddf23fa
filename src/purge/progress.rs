use std::sync::atomic::{AtomicU32, Ordering};

use serde::Serialize;

use super::JobSummary;

/// Snapshot emitted after every processed submission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PurgeProgress {
    /// Submissions processed so far (deleted, failed or skipped)
    pub processed: usize,
    pub total: usize,
    /// `processed / total`, 1.0 once the job is done
    pub fraction: f64,
    /// 1-based index of the chunk being processed
    pub chunk: usize,
    pub chunks: usize,
}

/// Sink for purge status updates.
pub trait ProgressReporter: Send + Sync {
    fn progress(&self, progress: &PurgeProgress);

    /// Called once. `success` is false only when the job itself aborted.
    fn finished(&self, success: bool, summary: &JobSummary);
}

/// Reports through `tracing`: every item at trace level, every tenth of the
/// job at info.
#[derive(Debug, Default)]
pub struct TracingReporter {
    last_decile: AtomicU32,
}

impl TracingReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressReporter for TracingReporter {
    fn progress(&self, progress: &PurgeProgress) {
        tracing::trace!(
            processed = progress.processed,
            total = progress.total,
            chunk = progress.chunk,
            "Purge progress"
        );

        let decile = (progress.fraction * 10.0).floor() as u32;
        if decile > self.last_decile.swap(decile, Ordering::Relaxed) {
            tracing::info!(
                processed = progress.processed,
                total = progress.total,
                chunk = progress.chunk,
                chunks = progress.chunks,
                "Clearing submission data: {}%",
                decile * 10
            );
        }
    }

    fn finished(&self, success: bool, summary: &JobSummary) {
        if success {
            tracing::info!(
                deleted = summary.deleted,
                skipped = summary.skipped,
                failed = summary.failures.len(),
                "Process finished"
            );
        } else {
            tracing::error!(
                processed = summary.processed,
                total = summary.total,
                deleted = summary.deleted,
                "Finished with an error"
            );
        }
    }
}
