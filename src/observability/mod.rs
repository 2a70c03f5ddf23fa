//! Observability: structured logging via `tracing`.
//!
//! The library only emits events; the binary installs the subscriber.

#[cfg(feature = "cli")]
mod tracing_init;

#[cfg(feature = "cli")]
pub use tracing_init::*;
