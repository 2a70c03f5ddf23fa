//! Parameter resolution and candidate selection.
//!
//! Explicit overrides win over the settings stored on the form. Selection
//! never touches submissions until an eligible form has been found.

use std::num::NonZeroU32;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::{Clock, Confirmer, PurgeError};
use crate::{
    db::{FormRepo, SubmissionRepo},
    models::{Form, PurgeScope, SubmissionId},
};

/// One day in seconds.
pub const DAY_IN_SECONDS: i64 = 86_400;

/// Largest `--purge-days` the command line accepts (about 10,000 years).
pub const MAX_PURGE_DAYS: u32 = 3_650_000;

/// Explicit purge arguments. `None` means "use the form's stored setting".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeOverrides {
    pub scope: Option<PurgeScope>,
    pub days: Option<u32>,
}

impl PurgeOverrides {
    /// Days override with an explicit zero dropped.
    ///
    /// Zero retention would mean "purge everything", which is never what
    /// an operator typing `--purge-days 0` gets: it falls back to the
    /// form's stored retention instead.
    pub fn effective_days(&self) -> Option<NonZeroU32> {
        match self.days {
            Some(0) => {
                tracing::warn!("Ignoring purge-days override of 0, using the form setting");
                None
            }
            Some(days) => NonZeroU32::new(days),
            None => None,
        }
    }
}

/// Fully resolved purge parameters for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurgeRequest {
    pub form_id: String,
    pub scope: PurgeScope,
    pub days: NonZeroU32,
    /// Submissions created strictly before this instant are candidates
    pub cutoff: DateTime<Utc>,
}

impl PurgeRequest {
    /// A retention longer than the representable past clamps the cutoff to
    /// the earliest instant, which matches nothing.
    fn new(form_id: String, scope: PurgeScope, days: NonZeroU32, now: DateTime<Utc>) -> Self {
        let cutoff = Duration::try_seconds(i64::from(days.get()) * DAY_IN_SECONDS)
            .and_then(|age| now.checked_sub_signed(age))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self {
            form_id,
            scope,
            days,
            cutoff,
        }
    }
}

/// Outcome of candidate selection.
#[derive(Debug, Clone)]
pub struct Selection {
    pub form: Form,
    pub request: PurgeRequest,
    /// Ascending submission ids to delete
    pub candidate_ids: Vec<SubmissionId>,
    /// All submissions of the form, candidates or not
    pub total_submissions: i64,
}

impl Selection {
    /// Question put to the operator before anything is deleted.
    pub fn prompt(&self) -> String {
        format!(
            "Are you sure you want to delete {} of {} from '{}' form?",
            self.candidate_ids.len(),
            self.total_submissions,
            self.form.label
        )
    }

    /// Ask the operator; a declined prompt becomes [`PurgeError::UserAborted`].
    pub fn confirm(&self, confirmer: &dyn Confirmer) -> Result<(), PurgeError> {
        if confirmer.confirm(&self.prompt())? {
            Ok(())
        } else {
            tracing::info!(form_id = %self.form.id, "Purge declined by operator");
            Err(PurgeError::UserAborted)
        }
    }
}

/// Resolve effective parameters for `form_id` and collect the candidate set.
pub async fn select_candidates(
    forms: &dyn FormRepo,
    submissions: &dyn SubmissionRepo,
    clock: &dyn Clock,
    form_id: &str,
    overrides: &PurgeOverrides,
) -> Result<Selection, PurgeError> {
    let days_override = overrides.effective_days();

    let form = forms
        .find_eligible(form_id, overrides.scope.is_some(), days_override.is_some())
        .await?
        .ok_or_else(|| PurgeError::FormNotEligible(form_id.to_string()))?;

    let days = days_override
        .or_else(|| NonZeroU32::new(form.purge_days))
        .ok_or_else(|| PurgeError::FormNotEligible(form_id.to_string()))?;
    let scope = overrides
        .scope
        .or_else(|| form.purge_mode.scope())
        .ok_or_else(|| PurgeError::FormNotEligible(form_id.to_string()))?;

    let request = PurgeRequest::new(form.id.clone(), scope, days, clock.now());

    tracing::debug!(
        form_id = %request.form_id,
        scope = %request.scope,
        days = request.days.get(),
        cutoff = %request.cutoff,
        "Resolved purge parameters"
    );

    let candidate_ids = submissions
        .query_ids(&form.id, request.cutoff, scope.draft_filter())
        .await?;

    if candidate_ids.is_empty() {
        return Err(PurgeError::NoCandidates(form.id));
    }

    let total_submissions = submissions.count(&form.id).await?;

    Ok(Selection {
        form,
        request,
        candidate_ids,
        total_submissions,
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_effective_days() {
        let overrides = |days| PurgeOverrides { scope: None, days };
        assert_eq!(overrides(None).effective_days(), None);
        assert_eq!(overrides(Some(0)).effective_days(), None);
        assert_eq!(overrides(Some(7)).effective_days(), NonZeroU32::new(7));
    }

    #[test]
    fn test_cutoff_is_days_before_now() {
        let now = Utc.with_ymd_and_hms(2025, 6, 8, 0, 0, 0).unwrap();
        let request = PurgeRequest::new(
            "contact".into(),
            PurgeScope::All,
            NonZeroU32::new(7).unwrap(),
            now,
        );
        assert_eq!(request.cutoff, Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap());
        assert_eq!(
            (now - request.cutoff).num_seconds(),
            7 * DAY_IN_SECONDS
        );
    }

    #[test]
    fn test_huge_retention_clamps_cutoff() {
        let now = Utc.with_ymd_and_hms(2025, 6, 8, 0, 0, 0).unwrap();
        let request = PurgeRequest::new(
            "contact".into(),
            PurgeScope::All,
            NonZeroU32::new(u32::MAX).unwrap(),
            now,
        );
        assert_eq!(request.cutoff, DateTime::<Utc>::MIN_UTC);
    }
}
