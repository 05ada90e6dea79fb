//! One focus session: extractor, classifier and scheduler wired in series.
//!
//! A session owns its smoothing window and scheduler state outright. Every
//! input goes through `&mut self`, so frames, ticks and visibility signals
//! are serialized by construction. Stopping consumes the session and
//! returns its summary.

use serde::Serialize;

use focusguard_common::clock::SessionClock;
use focusguard_common::config::EngineConfig;
use focusguard_common::error::FocusResult;
use focusguard_session_model::event::EngineEvent;
use focusguard_session_model::input::{InputKind, SessionInput};
use focusguard_session_model::landmark::LandmarkFrame;
use focusguard_session_model::state::{DisciplineState, DistractionReason};
use focusguard_session_model::summary::{Grade, SessionSummary};
use focusguard_session_model::TimestampNs;

use crate::classifier::FocusClassifier;
use crate::metrics::{self, Metrics};
use crate::scheduler::{InterventionScheduler, SchedulerState};
use crate::sink::EventSink;

/// Point-in-time view of a session, for status displays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub state: DisciplineState,
    pub metrics: Option<Metrics>,
    pub face_detected: bool,
    pub fraction_not_focused: f64,
    pub window_len: usize,
    pub streak_seconds: u64,
    pub trigger_count: u64,
    pub average_recovery_secs: Option<f64>,
}

/// A running focus session.
#[derive(Debug, Clone)]
pub struct FocusSession {
    classifier: FocusClassifier,
    scheduler: InterventionScheduler,
    state: DisciplineState,
    last_metrics: Option<Metrics>,
    face_detected: bool,
    first_input_at: Option<TimestampNs>,
    last_input_at: Option<TimestampNs>,
    frames_processed: u64,
    dropped_frames: u64,
}

impl FocusSession {
    /// Validate the configuration and start a session.
    ///
    /// An invalid configuration is the only way a session can fail.
    pub fn start(config: EngineConfig) -> FocusResult<Self> {
        config.validate()?;
        tracing::info!(
            buffer_size = config.buffer_size,
            smoothing_ratio = config.smoothing_ratio,
            cooldown_seconds = config.cooldown_seconds,
            gaze_checks = config.iris_bounds().is_some(),
            "Focus session started"
        );
        Ok(Self {
            classifier: FocusClassifier::new(&config),
            scheduler: InterventionScheduler::new(&config),
            state: DisciplineState::Focused,
            last_metrics: None,
            face_detected: false,
            first_input_at: None,
            last_input_at: None,
            frames_processed: 0,
            dropped_frames: 0,
        })
    }

    /// Current debounced state.
    pub fn state(&self) -> DisciplineState {
        self.state
    }

    pub fn scheduler_state(&self) -> &SchedulerState {
        self.scheduler.state()
    }

    /// Process one frame with a detected face.
    ///
    /// A frame whose metrics cannot be extracted is dropped: the state and
    /// the smoothing window stay as they were and an `ExtractionError` event
    /// is returned.
    pub fn on_frame(&mut self, frame: &LandmarkFrame, now: TimestampNs) -> Vec<EngineEvent> {
        self.note_input(now);
        self.frames_processed += 1;

        let metrics = match metrics::extract(frame) {
            Ok(metrics) => metrics,
            Err(err) => {
                self.dropped_frames += 1;
                tracing::warn!(t = now, error = %err, "Dropping frame");
                return vec![EngineEvent::extraction_error(now, &err)];
            }
        };

        self.last_metrics = Some(metrics);
        self.face_detected = true;
        let sample = self.classifier.classify(&metrics);
        let next = self.classifier.smooth(sample);
        self.transition(next, now)
    }

    /// Process a detector pass that found no face.
    pub fn on_no_face(&mut self, now: TimestampNs) -> Vec<EngineEvent> {
        self.note_input(now);
        self.frames_processed += 1;
        self.face_detected = false;

        let sample = self.classifier.classify_no_face();
        let next = self.classifier.smooth(sample);
        self.transition(next, now)
    }

    /// Process the 1 Hz wall-clock tick.
    pub fn on_tick(&mut self, now: TimestampNs) -> Vec<EngineEvent> {
        self.note_input(now);
        self.scheduler.tick(self.state, now).into_iter().collect()
    }

    /// The monitored surface left the foreground: force a distracted edge
    /// without touching the smoothing window. No-op while distracted.
    pub fn on_visibility_lost(&mut self, now: TimestampNs) -> Vec<EngineEvent> {
        self.note_input(now);
        if self.state.is_distracted() {
            tracing::debug!(t = now, "Visibility lost while already distracted");
            return Vec::new();
        }
        self.transition(DisciplineState::Distracted(DistractionReason::SwitchedAway), now)
    }

    /// Dispatch a recorded input and hand the resulting events to `sink`.
    pub fn process<S: EventSink + ?Sized>(&mut self, input: &SessionInput, sink: &mut S) {
        let now = input.timestamp_ns;
        let events = match &input.kind {
            InputKind::Frame { landmarks } => self.on_frame(landmarks, now),
            InputKind::NoFace => self.on_no_face(now),
            InputKind::Tick => self.on_tick(now),
            InputKind::VisibilityLost => self.on_visibility_lost(now),
        };
        for event in &events {
            sink.emit(event);
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let scheduler = self.scheduler.state();
        SessionSnapshot {
            state: self.state,
            metrics: self.last_metrics,
            face_detected: self.face_detected,
            fraction_not_focused: self.classifier.buffer().fraction_not_focused(),
            window_len: self.classifier.buffer().len(),
            streak_seconds: scheduler.streak_seconds,
            trigger_count: scheduler.trigger_count,
            average_recovery_secs: scheduler.average_recovery_secs(),
        }
    }

    /// End the session, discarding all state.
    pub fn stop(self) -> SessionSummary {
        let scheduler = self.scheduler.state();
        let duration_ns = match (self.first_input_at, self.last_input_at) {
            (Some(first), Some(last)) => last.saturating_sub(first),
            _ => 0,
        };
        let summary = SessionSummary {
            duration_secs: SessionClock::ns_to_secs(duration_ns),
            trigger_count: scheduler.trigger_count,
            distraction_count: scheduler.distraction_count,
            recovery_count: scheduler.recovery_samples.len(),
            average_recovery_secs: scheduler.average_recovery_secs(),
            longest_streak_secs: scheduler.longest_streak_seconds,
            dropped_frames: self.dropped_frames,
            grade: Grade::from_trigger_count(scheduler.trigger_count),
        };
        tracing::info!(
            frames = self.frames_processed,
            dropped = self.dropped_frames,
            triggers = summary.trigger_count,
            grade = %summary.grade,
            "Focus session stopped"
        );
        summary
    }

    fn transition(&mut self, next: DisciplineState, now: TimestampNs) -> Vec<EngineEvent> {
        let events = self.scheduler.observe(self.state, next, now);
        self.state = next;
        events
    }

    fn note_input(&mut self, now: TimestampNs) {
        self.first_input_at.get_or_insert(now);
        self.last_input_at = Some(now);
    }
}
