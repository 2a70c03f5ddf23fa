use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Submission identifier. Ascending ids follow insertion order.
pub type SubmissionId = i64;

/// One recorded submission against a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: SubmissionId,
    pub form_id: String,
    /// When the submission was first saved (second precision)
    pub created_at: DateTime<Utc>,
    /// Unfinished submissions saved as drafts
    pub is_draft: bool,
}

/// Input for recording a submission.
#[derive(Debug, Clone, Default)]
pub struct CreateSubmission {
    pub form_id: String,
    pub created_at: DateTime<Utc>,
    pub is_draft: bool,
    /// Field values, keyed by element name
    pub data: BTreeMap<String, String>,
}
