//! Consolidated test modules.
//!
//! End-to-end purge runs against a migrated in-memory database.
