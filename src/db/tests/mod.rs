//! Shared database repository test infrastructure
//!
//! Each repository has a test module containing shared test functions that
//! take a test context of `&dyn XxxRepo` trait objects, plus a `sqlite_tests`
//! submodule that runs them against a fresh in-memory database with the real
//! migrations applied.
//!
//! # Running tests
//!
//! ```bash
//! cargo test db::tests
//! ```
