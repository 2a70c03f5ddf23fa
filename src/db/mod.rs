mod error;
pub mod repos;
pub mod sqlite;

#[cfg(test)]
pub mod tests;

use std::sync::Arc;

pub use error::{DbError, DbResult};
pub use repos::*;

use crate::config::DatabaseConfig;

/// Cached repository trait objects, created once at startup.
struct CachedRepos {
    forms: Arc<dyn FormRepo>,
    submissions: Arc<dyn SubmissionRepo>,
    purge_locks: Arc<dyn PurgeLockRepo>,
}

/// Database pool for the form entity store.
///
/// Repositories are cached at construction time to avoid allocation on each access.
pub struct DbPool {
    pool: sqlx::SqlitePool,
    repos: CachedRepos,
}

impl DbPool {
    /// Create a DbPool from an existing SQLite pool.
    /// Primarily useful for testing.
    pub fn from_sqlite(pool: sqlx::SqlitePool) -> Self {
        let repos = CachedRepos {
            forms: Arc::new(sqlite::SqliteFormRepo::new(pool.clone())),
            submissions: Arc::new(sqlite::SqliteSubmissionRepo::new(pool.clone())),
            purge_locks: Arc::new(sqlite::SqlitePurgeLockRepo::new(pool.clone())),
        };
        DbPool { pool, repos }
    }

    /// Create a database pool from configuration.
    pub async fn from_config(config: &DatabaseConfig) -> DbResult<Self> {
        match config {
            DatabaseConfig::None => Err(DbError::NotConfigured),
            DatabaseConfig::Sqlite(cfg) => {
                let pool = sqlx::sqlite::SqlitePoolOptions::new()
                    .max_connections(cfg.max_connections)
                    .connect_with(
                        sqlx::sqlite::SqliteConnectOptions::new()
                            .filename(&cfg.path)
                            .create_if_missing(cfg.create_if_missing)
                            .foreign_keys(true)
                            .journal_mode(if cfg.wal_mode {
                                sqlx::sqlite::SqliteJournalMode::Wal
                            } else {
                                sqlx::sqlite::SqliteJournalMode::Delete
                            })
                            .busy_timeout(std::time::Duration::from_millis(cfg.busy_timeout_ms)),
                    )
                    .await?;

                let db = Self::from_sqlite(pool);
                if cfg.run_migrations {
                    db.run_migrations().await?;
                }
                Ok(db)
            }
        }
    }

    /// Apply pending schema migrations.
    pub async fn run_migrations(&self) -> DbResult<()> {
        tracing::info!("Running SQLite migrations");
        sqlx::migrate!("./migrations_sqlx/sqlite")
            .run(&self.pool)
            .await?;
        tracing::info!("SQLite migrations completed successfully");
        Ok(())
    }

    /// Get form repository
    pub fn forms(&self) -> Arc<dyn FormRepo> {
        Arc::clone(&self.repos.forms)
    }

    /// Get submission repository
    pub fn submissions(&self) -> Arc<dyn SubmissionRepo> {
        Arc::clone(&self.repos.submissions)
    }

    /// Get purge lock repository
    pub fn purge_locks(&self) -> Arc<dyn PurgeLockRepo> {
        Arc::clone(&self.repos.purge_locks)
    }

    /// Close all connections, waiting for in-flight statements to finish.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
