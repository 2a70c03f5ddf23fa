use chrono::{DateTime, Utc};

use crate::{
    db::error::{DbError, DbResult},
    models::PurgeMode,
};

/// Upper bound on `?` parameters per statement; older SQLite builds cap it at 999.
pub const MAX_BIND_PARAMS: usize = 900;

/// Convert stored Unix seconds back into a timestamp.
pub fn from_unix(secs: i64) -> DbResult<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| DbError::Internal(format!("Invalid timestamp in database: {}", secs)))
}

pub fn parse_purge_mode(s: &str) -> DbResult<PurgeMode> {
    s.parse().map_err(DbError::Internal)
}

/// Comma-separated `?` placeholders for an `IN` clause.
pub fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}
