//! FocusGuard Session Model
//!
//! Defines the data contracts shared by the engine and its collaborators:
//! - **Landmarks:** Face-mesh frames and the anatomical index schema
//! - **State:** The debounced discipline state and distraction reasons
//! - **Inputs:** Timestamped session inputs (frames, ticks, visibility)
//! - **Events:** Structured decisions handed to external senders
//! - **Summary:** End-of-session report card
//!
//! All landmark coordinates are normalized to `[0.0, 1.0]` relative to the
//! camera image, as produced by MediaPipe Face Mesh.

pub mod event;
pub mod input;
pub mod landmark;
pub mod state;
pub mod summary;
pub mod synthetic;

pub use event::*;
pub use input::*;
pub use landmark::*;
pub use state::*;
pub use summary::*;

/// Monotonic timestamp in nanoseconds since session start.
pub type TimestampNs = u64;
