//! FocusGuard Focus Engine
//!
//! Turns a stream of face-landmark frames into focus decisions:
//! - **Metrics:** eye aperture, head yaw and iris offset per frame
//! - **Classification:** threshold rules, then a sliding-window debounce
//! - **Scheduling:** cooldown-gated triggers, recovery timing, focus streaks
//!
//! The engine does no I/O. Inputs are data, decisions leave through an
//! [`EventSink`]. A session is driven either directly through
//! `&mut FocusSession` or by a [`SessionActor`] task.

pub mod actor;
pub mod classifier;
pub mod metrics;
pub mod replay;
pub mod scheduler;
pub mod session;
pub mod sink;

pub use actor::{ActorError, SessionActor, SessionCommand, SessionHandle};
pub use classifier::{FocusClassifier, FocusSample, SmoothingBuffer};
pub use metrics::{extract, Metrics};
pub use replay::{replay, ReplayFeed, ReplayOptions, ReplayStats, TickSynthesizer};
pub use scheduler::{InterventionScheduler, SchedulerState};
pub use session::{FocusSession, SessionSnapshot};
pub use sink::{ChannelSink, EventSink, Tee, TracingSink, VecSink};
