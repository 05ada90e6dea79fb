//! Clock and timing utilities for focus sessions.
//!
//! Every session stream is anchored to a monotonic epoch recorded at
//! session start. Frame, tick, and visibility timestamps are nanoseconds
//! since that epoch. This module provides:
//! - Capturing the epoch
//! - Converting between nanoseconds and seconds
//! - Pacing the 1 Hz streak tick from arbitrary frame timestamps

use std::time::Instant;

/// Nanoseconds in one second.
pub const NANOS_PER_SEC: u64 = 1_000_000_000;

/// A session clock that provides monotonic timestamps relative to
/// a fixed epoch (the moment the session started).
#[derive(Debug, Clone)]
pub struct SessionClock {
    /// The instant the session started.
    epoch: Instant,

    /// Wall-clock time at epoch (ISO 8601 string).
    epoch_wall: String,
}

impl SessionClock {
    /// Create a new session clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Get nanoseconds elapsed since session start.
    pub fn elapsed_ns(&self) -> u64 {
        self.epoch.elapsed().as_nanos() as u64
    }

    /// Get seconds elapsed since session start.
    pub fn elapsed_secs(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    /// Wall-clock time at session start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }

    /// Convert a nanosecond value to seconds.
    pub fn ns_to_secs(ns: u64) -> f64 {
        ns as f64 / NANOS_PER_SEC as f64
    }

    /// Convert seconds to nanoseconds.
    pub fn secs_to_ns(secs: f64) -> u64 {
        (secs * NANOS_PER_SEC as f64) as u64
    }
}

/// Largest gap, in ticks, a [`TickPacer`] fills in before re-anchoring.
pub const DEFAULT_MAX_CATCH_UP_TICKS: u64 = 3_600;

/// Derives fixed-rate tick timestamps from an irregular timestamp stream.
///
/// The first observed timestamp anchors the pacer. Each later observation
/// yields one tick per whole interval elapsed since the previous tick, so a
/// gap of 3.5 s produces three ticks. A gap longer than the catch-up limit
/// yields no ticks and re-anchors the pacer at the new timestamp.
#[derive(Debug, Clone)]
pub struct TickPacer {
    interval_ns: u64,
    max_catch_up: u64,
    last_tick_ns: Option<u64>,
}

impl TickPacer {
    /// Create a pacer emitting `hz` ticks per second.
    pub fn new(hz: u32) -> Self {
        Self {
            interval_ns: NANOS_PER_SEC / hz.max(1) as u64,
            max_catch_up: DEFAULT_MAX_CATCH_UP_TICKS,
            last_tick_ns: None,
        }
    }

    /// The 1 Hz pacer used for streak accounting.
    pub fn one_hz() -> Self {
        Self::new(1)
    }

    /// Limit how many ticks one call may produce.
    pub fn with_max_catch_up(mut self, ticks: u64) -> Self {
        self.max_catch_up = ticks;
        self
    }

    /// Anchor the pacer without producing ticks. Later calls to
    /// [`TickPacer::advance_to`] count intervals from here.
    pub fn anchor(&mut self, start_ns: u64) {
        self.last_tick_ns = Some(start_ns);
    }

    /// Advance to `now_ns`, returning the timestamps of all ticks due.
    /// Timestamps that go backwards produce no ticks.
    pub fn advance_to(&mut self, now_ns: u64) -> Vec<u64> {
        let Some(last) = self.last_tick_ns else {
            self.last_tick_ns = Some(now_ns);
            return Vec::new();
        };
        if now_ns <= last {
            return Vec::new();
        }

        let due = (now_ns - last) / self.interval_ns;
        if due > self.max_catch_up {
            tracing::warn!(
                from_ns = last,
                to_ns = now_ns,
                ticks = due,
                max_ticks = self.max_catch_up,
                "Timestamp gap too large, re-anchoring tick pacer"
            );
            self.last_tick_ns = Some(now_ns);
            return Vec::new();
        }

        // last + due * interval <= now_ns, so none of these overflow
        let ticks: Vec<u64> = (1..=due).map(|k| last + k * self.interval_ns).collect();
        self.last_tick_ns = Some(last + due * self.interval_ns);
        ticks
    }

    /// Target interval in nanoseconds.
    pub fn interval_ns(&self) -> u64 {
        self.interval_ns
    }
}
