mod common;
mod forms;
mod purge_locks;
mod submissions;

pub use forms::SqliteFormRepo;
pub use purge_locks::SqlitePurgeLockRepo;
pub use submissions::SqliteSubmissionRepo;
