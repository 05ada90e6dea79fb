//! FocusGuard Common Utilities
//!
//! Shared infrastructure for all FocusGuard crates:
//! - Error types and result aliases
//! - Session clock and 1 Hz tick pacing
//! - Tracing/logging initialization
//! - Engine and application configuration

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
