//! Retention purge of form submissions.
//!
//! Selection resolves the effective scope and age for a form and returns
//! the ids of matching submissions. The job deletes them in chunks,
//! reporting progress after each item and collecting per-item failures
//! instead of stopping. [`PurgeService`] ties both together behind a
//! per-form lock.

mod clock;
mod confirm;
pub mod engine;
mod error;
mod job;
mod lease;
mod progress;
mod selection;
mod service;

#[cfg(feature = "cli")]
pub use confirm::TerminalConfirmer;
pub use clock::{Clock, FixedClock, SystemClock};
pub use confirm::{AssumeYes, Confirmer};
pub use error::PurgeError;
pub use job::{DEFAULT_CHUNK_SIZE, JobState, JobSummary, PurgeFailure, PurgeJob};
pub use lease::PurgeLease;
pub use progress::{ProgressReporter, PurgeProgress, TracingReporter};
pub use selection::{
    DAY_IN_SECONDS, MAX_PURGE_DAYS, PurgeOverrides, PurgeRequest, Selection, select_candidates,
};
pub use service::{PurgeReport, PurgeService};
