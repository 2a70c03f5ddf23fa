//! Resumable chunked deletion state.
//!
//! A [`PurgeJob`] is a value: [`PurgeJob::step`] consumes it, processes one
//! chunk and hands back the advanced job. Everything needed to resume lives
//! on the job (remaining ids via the cursor, progress, totals), so a host
//! may stop between steps and continue later.

use std::{collections::HashMap, sync::Arc};

use serde::Serialize;

use super::{ProgressReporter, PurgeError, PurgeProgress};
use crate::{
    db::SubmissionRepo,
    models::{Submission, SubmissionId},
};

/// Default number of submissions handled per step.
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// A submission that could not be deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurgeFailure {
    pub id: SubmissionId,
    pub error: String,
}

/// Where a job is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    NotStarted,
    /// `chunk` chunks of `chunks` done so far
    Running { chunk: usize, chunks: usize },
    Completed,
}

/// Counters of a job at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JobSummary {
    pub total: usize,
    pub processed: usize,
    pub deleted: usize,
    /// Candidates that had already disappeared when their chunk was loaded
    pub skipped: usize,
    pub failures: Vec<PurgeFailure>,
}

#[derive(Debug, Clone)]
pub struct PurgeJob {
    candidate_ids: Arc<[SubmissionId]>,
    cursor: usize,
    chunk_size: usize,
    chunks_processed: usize,
    deleted: usize,
    skipped: usize,
    failures: Vec<PurgeFailure>,
}

impl PurgeJob {
    /// A job over `candidate_ids`. A chunk size of zero is treated as one.
    pub fn new(candidate_ids: impl Into<Arc<[SubmissionId]>>, chunk_size: usize) -> Self {
        Self {
            candidate_ids: candidate_ids.into(),
            cursor: 0,
            chunk_size: chunk_size.max(1),
            chunks_processed: 0,
            deleted: 0,
            skipped: 0,
            failures: Vec::new(),
        }
    }

    pub fn total(&self) -> usize {
        self.candidate_ids.len()
    }

    /// Submissions processed so far; also the offset of the next chunk.
    pub fn progress(&self) -> usize {
        self.cursor
    }

    pub fn fraction_complete(&self) -> f64 {
        if self.total() == 0 {
            1.0
        } else {
            self.cursor as f64 / self.total() as f64
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_count(&self) -> usize {
        self.total().div_ceil(self.chunk_size)
    }

    pub fn chunks_processed(&self) -> usize {
        self.chunks_processed
    }

    pub fn deleted(&self) -> usize {
        self.deleted
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn failures(&self) -> &[PurgeFailure] {
        &self.failures
    }

    /// Ids not yet processed.
    pub fn remaining_ids(&self) -> &[SubmissionId] {
        &self.candidate_ids[self.cursor..]
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= self.total()
    }

    pub fn state(&self) -> JobState {
        if self.is_complete() {
            JobState::Completed
        } else if self.cursor == 0 {
            JobState::NotStarted
        } else {
            JobState::Running {
                chunk: self.chunks_processed,
                chunks: self.chunk_count(),
            }
        }
    }

    pub fn summary(&self) -> JobSummary {
        JobSummary {
            total: self.total(),
            processed: self.cursor,
            deleted: self.deleted,
            skipped: self.skipped,
            failures: self.failures.clone(),
        }
    }

    /// Process the next chunk and return the advanced job.
    ///
    /// Individual delete failures are recorded and never stop the chunk.
    /// An error here means the chunk could not be loaded at all; the job
    /// consumed by this call had not advanced and can be rebuilt from its
    /// last returned value.
    pub async fn step(
        self,
        submissions: &dyn SubmissionRepo,
        reporter: &dyn ProgressReporter,
    ) -> Result<PurgeJob, PurgeError> {
        if self.is_complete() {
            return Ok(self);
        }

        let mut job = self;
        let end = (job.cursor + job.chunk_size).min(job.total());
        let chunk_ids = Arc::clone(&job.candidate_ids);
        let chunk_ids = &chunk_ids[job.cursor..end];
        let chunk = job.chunks_processed + 1;
        let chunks = job.chunk_count();

        let mut loaded: HashMap<SubmissionId, Submission> = submissions
            .load_many(chunk_ids)
            .await?
            .into_iter()
            .map(|submission| (submission.id, submission))
            .collect();

        tracing::debug!(
            chunk,
            chunks,
            requested = chunk_ids.len(),
            loaded = loaded.len(),
            "Processing purge chunk"
        );

        for id in chunk_ids {
            match loaded.remove(id) {
                Some(submission) => match submissions.delete(&submission).await {
                    Ok(()) => job.deleted += 1,
                    Err(e) => {
                        tracing::error!(
                            submission_id = submission.id,
                            error = %e,
                            "Failed to delete submission"
                        );
                        job.failures.push(PurgeFailure {
                            id: submission.id,
                            error: e.to_string(),
                        });
                    }
                },
                None => {
                    tracing::debug!(submission_id = *id, "Submission already gone, skipping");
                    job.skipped += 1;
                }
            }

            job.cursor += 1;
            reporter.progress(&PurgeProgress {
                processed: job.cursor,
                total: job.total(),
                fraction: job.fraction_complete(),
                chunk,
                chunks,
            });
        }

        job.chunks_processed = chunk;
        Ok(job)
    }
}
