//! End-to-end purge of one form.
//!
//! [`PurgeService::run`] takes the per-form lock, selects candidates, asks
//! for confirmation and drives the deletion job, renewing the lock between
//! chunks. The lock is released on every exit path.

use std::{num::NonZeroU32, sync::Arc, time::Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{
    Clock, Confirmer, ProgressReporter, PurgeError, PurgeFailure, PurgeJob, PurgeLease,
    PurgeOverrides, engine, select_candidates,
};
use crate::{
    config::PurgeConfig,
    db::{DbPool, FormRepo, PurgeLockRepo, SubmissionRepo},
    models::PurgeScope,
};

/// Outcome of a purge run.
#[derive(Debug, Clone, Serialize)]
pub struct PurgeReport {
    pub form_id: String,
    pub label: String,
    pub scope: PurgeScope,
    pub days: NonZeroU32,
    pub cutoff: DateTime<Utc>,
    /// Submissions matching the age and scope filters
    pub candidates: usize,
    /// All submissions the form had when the run started
    pub total_submissions: i64,
    pub deleted: usize,
    pub skipped: usize,
    pub failures: Vec<PurgeFailure>,
    pub dry_run: bool,
    pub duration_ms: u64,
}

impl PurgeReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

pub struct PurgeService {
    forms: Arc<dyn FormRepo>,
    submissions: Arc<dyn SubmissionRepo>,
    locks: Arc<dyn PurgeLockRepo>,
    clock: Arc<dyn Clock>,
    config: PurgeConfig,
}

impl PurgeService {
    pub fn new(db: &DbPool, clock: Arc<dyn Clock>, config: PurgeConfig) -> Self {
        Self::with_repos(db.forms(), db.submissions(), db.purge_locks(), clock, config)
    }

    /// Build from individual repositories, e.g. to wrap one of them in tests.
    pub fn with_repos(
        forms: Arc<dyn FormRepo>,
        submissions: Arc<dyn SubmissionRepo>,
        locks: Arc<dyn PurgeLockRepo>,
        clock: Arc<dyn Clock>,
        config: PurgeConfig,
    ) -> Self {
        Self {
            forms,
            submissions,
            locks,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &PurgeConfig {
        &self.config
    }

    /// Purge old submissions of `form_id`.
    pub async fn run(
        &self,
        form_id: &str,
        overrides: &PurgeOverrides,
        confirmer: &dyn Confirmer,
        reporter: &dyn ProgressReporter,
    ) -> Result<PurgeReport, PurgeError> {
        let lease = PurgeLease::acquire(
            Arc::clone(&self.locks),
            Arc::clone(&self.clock),
            form_id,
            self.config.lock_ttl(),
        )
        .await?;

        let result = self
            .run_locked(&lease, overrides, confirmer, reporter)
            .await;

        lease.release().await;
        result
    }

    async fn run_locked(
        &self,
        lease: &PurgeLease,
        overrides: &PurgeOverrides,
        confirmer: &dyn Confirmer,
        reporter: &dyn ProgressReporter,
    ) -> Result<PurgeReport, PurgeError> {
        let started = Instant::now();
        let dry_run = self.config.dry_run;
        let dry_run_msg = if dry_run { " (DRY RUN)" } else { "" };

        let selection = select_candidates(
            self.forms.as_ref(),
            self.submissions.as_ref(),
            self.clock.as_ref(),
            lease.form_id(),
            overrides,
        )
        .await?;

        tracing::info!(
            form_id = %selection.form.id,
            scope = %selection.request.scope,
            days = selection.request.days.get(),
            candidates = selection.candidate_ids.len(),
            total = selection.total_submissions,
            "Selected submissions for purge{}",
            dry_run_msg
        );

        let mut report = PurgeReport {
            form_id: selection.form.id.clone(),
            label: selection.form.label.clone(),
            scope: selection.request.scope,
            days: selection.request.days,
            cutoff: selection.request.cutoff,
            candidates: selection.candidate_ids.len(),
            total_submissions: selection.total_submissions,
            deleted: 0,
            skipped: 0,
            failures: Vec::new(),
            dry_run,
            duration_ms: 0,
        };

        if dry_run {
            report.duration_ms = elapsed_ms(started);
            return Ok(report);
        }

        if self.config.require_confirmation {
            selection.confirm(confirmer)?;
        }

        let job = PurgeJob::new(selection.candidate_ids, self.config.chunk_size);
        let job =
            engine::run_to_completion(job, self.submissions.as_ref(), reporter, Some(lease))
                .await?;

        report.deleted = job.deleted();
        report.skipped = job.skipped();
        report.failures = job.failures().to_vec();
        report.duration_ms = elapsed_ms(started);

        tracing::info!(
            form_id = %report.form_id,
            deleted = report.deleted,
            skipped = report.skipped,
            failed = report.failures.len(),
            duration_ms = report.duration_ms,
            "Purge complete"
        );

        Ok(report)
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
