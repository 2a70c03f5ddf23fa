//! Age-based retention purge for form submissions.
//!
//! Forms carry a purge policy (which submissions, how old). A purge run
//! selects the matching submissions of one form and deletes them in
//! bounded chunks, tolerating individual failures.

pub mod config;
pub mod db;
pub mod models;
pub mod observability;
pub mod purge;

#[cfg(test)]
mod tests;
