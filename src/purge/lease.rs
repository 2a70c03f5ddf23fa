//! Per-form purge lock held by one run.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::{Clock, PurgeError};
use crate::db::PurgeLockRepo;

/// Ownership of a form's purge lock.
///
/// The lock goes stale `ttl` after it was last acquired or renewed, so a
/// long job must [`renew`](PurgeLease::renew) it between chunks.
pub struct PurgeLease {
    locks: Arc<dyn PurgeLockRepo>,
    clock: Arc<dyn Clock>,
    form_id: String,
    holder: String,
}

impl PurgeLease {
    /// Take the lock for `form_id`, replacing one last renewed more than
    /// `ttl` ago. Fails with [`PurgeError::PurgeInProgress`] if it is held.
    pub async fn acquire(
        locks: Arc<dyn PurgeLockRepo>,
        clock: Arc<dyn Clock>,
        form_id: &str,
        ttl: Duration,
    ) -> Result<Self, PurgeError> {
        let holder = Uuid::new_v4().to_string();
        let now = clock.now();

        if !locks
            .acquire(form_id, &holder, now, stale_before(now, ttl))
            .await?
        {
            return Err(PurgeError::PurgeInProgress(form_id.to_string()));
        }
        tracing::debug!(form_id, holder = %holder, "Acquired purge lock");

        Ok(Self {
            locks,
            clock,
            form_id: form_id.to_string(),
            holder,
        })
    }

    pub fn form_id(&self) -> &str {
        &self.form_id
    }

    /// Push the lock's expiry forward. Fails with [`PurgeError::LockLost`]
    /// once another run has taken the lock over.
    pub async fn renew(&self) -> Result<(), PurgeError> {
        if self
            .locks
            .refresh(&self.form_id, &self.holder, self.clock.now())
            .await?
        {
            Ok(())
        } else {
            tracing::error!(form_id = %self.form_id, holder = %self.holder, "Purge lock lost");
            Err(PurgeError::LockLost(self.form_id.clone()))
        }
    }

    /// Give the lock up. A failure is logged; the lock then expires on its own.
    pub async fn release(self) {
        if let Err(e) = self.locks.release(&self.form_id, &self.holder).await {
            tracing::warn!(form_id = %self.form_id, error = %e, "Failed to release purge lock");
        }
    }
}

/// Locks acquired before this instant are stale. A TTL reaching past the
/// earliest representable time means no lock is ever stale.
fn stale_before(now: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    now.checked_sub_signed(ttl)
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
