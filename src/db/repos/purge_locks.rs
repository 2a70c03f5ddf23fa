use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::db::error::DbResult;

/// Per-form mutual exclusion for purge runs.
///
/// Backed by the database so that separate processes purging the same form
/// see each other's locks.
#[async_trait]
pub trait PurgeLockRepo: Send + Sync {
    /// Try to take the lock for `form_id`.
    ///
    /// A lock acquired before `stale_before` is treated as abandoned and
    /// replaced. Returns `false` if another holder owns a live lock.
    async fn acquire(
        &self,
        form_id: &str,
        holder: &str,
        now: DateTime<Utc>,
        stale_before: DateTime<Utc>,
    ) -> DbResult<bool>;

    /// Move the acquisition time of a lock `holder` owns forward to `now`.
    ///
    /// Returns `false` if the lock no longer belongs to `holder`, for example
    /// because it went stale and another run took it over.
    async fn refresh(&self, form_id: &str, holder: &str, now: DateTime<Utc>) -> DbResult<bool>;

    /// Release the lock if `holder` still owns it.
    async fn release(&self, form_id: &str, holder: &str) -> DbResult<()>;
}
