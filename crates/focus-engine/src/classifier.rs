//! Focus classification and flicker smoothing.
//!
//! # Algorithm
//!
//! 1. **Classify** each frame's metrics into a raw sample. Rules are checked
//!    in order and the first match wins: eyes closed, head turned, gaze off
//!    target. A frame with no face is "left desk" without any metrics.
//! 2. **Buffer** the raw sample in a fixed-size window, evicting the oldest.
//! 3. **Debounce**: the state is distracted once the not-focused fraction of
//!    the window reaches the smoothing ratio. The threshold sits below one
//!    half, so sustained distraction flips the state sooner than sustained
//!    recovery flips it back.

use std::collections::VecDeque;

use serde::Serialize;

use focusguard_common::config::EngineConfig;
use focusguard_session_model::state::{DisciplineState, DistractionReason};

use crate::metrics::Metrics;

/// Raw per-frame verdict, before smoothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "sample", content = "reason", rename_all = "snake_case")]
pub enum FocusSample {
    Focused,
    NotFocused(DistractionReason),
}

impl FocusSample {
    pub fn is_focused(&self) -> bool {
        matches!(self, Self::Focused)
    }

    pub fn reason(&self) -> Option<DistractionReason> {
        match self {
            Self::Focused => None,
            Self::NotFocused(reason) => Some(*reason),
        }
    }
}

/// Fixed-capacity FIFO of the most recent raw samples.
#[derive(Debug, Clone)]
pub struct SmoothingBuffer {
    samples: VecDeque<FocusSample>,
    capacity: usize,
}

impl SmoothingBuffer {
    /// Create an empty buffer. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest one when full.
    pub fn push(&mut self, sample: FocusSample) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Share of not-focused samples in the window; 0.0 when empty.
    pub fn fraction_not_focused(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let not_focused = self.samples.iter().filter(|s| !s.is_focused()).count();
        not_focused as f64 / self.samples.len() as f64
    }

    /// Reason of the newest not-focused sample still in the window.
    pub fn latest_reason(&self) -> Option<DistractionReason> {
        self.samples.iter().rev().find_map(FocusSample::reason)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FocusSample> {
        self.samples.iter()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

/// Threshold rules plus the smoothing window for one session.
#[derive(Debug, Clone)]
pub struct FocusClassifier {
    eye_closed_threshold: f64,
    yaw_low: f64,
    yaw_high: f64,
    iris_bounds: Option<(f64, f64)>,
    smoothing_ratio: f64,
    buffer: SmoothingBuffer,
}

impl FocusClassifier {
    /// Build a classifier from an already validated configuration.
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            eye_closed_threshold: config.eye_closed_threshold,
            yaw_low: config.yaw_low,
            yaw_high: config.yaw_high,
            iris_bounds: config.iris_bounds(),
            smoothing_ratio: config.smoothing_ratio,
            buffer: SmoothingBuffer::new(config.buffer_size),
        }
    }

    /// Raw verdict for one frame's metrics.
    pub fn classify(&self, metrics: &Metrics) -> FocusSample {
        if metrics.eye_aperture < self.eye_closed_threshold {
            return FocusSample::NotFocused(DistractionReason::EyesClosed);
        }

        if metrics.head_yaw < self.yaw_low || metrics.head_yaw > self.yaw_high {
            return FocusSample::NotFocused(DistractionReason::LookingAway);
        }

        if let (Some((low, high)), Some(offset)) = (self.iris_bounds, metrics.iris_offset) {
            if offset < low || offset > high {
                return FocusSample::NotFocused(DistractionReason::GazeOffTarget);
            }
        }

        FocusSample::Focused
    }

    /// Raw verdict for a frame in which no face was detected.
    pub fn classify_no_face(&self) -> FocusSample {
        FocusSample::NotFocused(DistractionReason::LeftDesk)
    }

    /// Push a raw sample and return the debounced state.
    pub fn smooth(&mut self, sample: FocusSample) -> DisciplineState {
        self.buffer.push(sample);
        self.state()
    }

    /// Debounced state of the current window, without pushing anything.
    pub fn state(&self) -> DisciplineState {
        match self.buffer.latest_reason() {
            Some(reason) if self.buffer.fraction_not_focused() >= self.smoothing_ratio => {
                DisciplineState::Distracted(reason)
            }
            _ => DisciplineState::Focused,
        }
    }

    pub fn buffer(&self) -> &SmoothingBuffer {
        &self.buffer
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(eye_aperture: f64, head_yaw: f64, iris_offset: Option<f64>) -> Metrics {
        Metrics {
            eye_aperture,
            head_yaw,
            iris_offset,
        }
    }

    fn not_focused() -> FocusSample {
        FocusSample::NotFocused(DistractionReason::LookingAway)
    }

    #[test]
    fn test_attentive_metrics_are_focused() {
        let classifier = FocusClassifier::new(&EngineConfig::default());
        assert_eq!(
            classifier.classify(&metrics(0.03, 0.5, Some(0.5))),
            FocusSample::Focused
        );
    }

    #[test]
    fn test_eyes_closed_wins_over_looking_away() {
        let classifier = FocusClassifier::new(&EngineConfig::default());
        assert_eq!(
            classifier.classify(&metrics(0.005, 0.95, None)),
            FocusSample::NotFocused(DistractionReason::EyesClosed)
        );
    }

    #[test]
    fn test_yaw_bounds_are_exclusive() {
        let classifier = FocusClassifier::new(&EngineConfig::default());
        assert!(classifier.classify(&metrics(0.03, 0.20, None)).is_focused());
        assert!(classifier.classify(&metrics(0.03, 0.80, None)).is_focused());
        assert_eq!(
            classifier.classify(&metrics(0.03, 0.19, None)),
            FocusSample::NotFocused(DistractionReason::LookingAway)
        );
        assert_eq!(
            classifier.classify(&metrics(0.03, 0.81, None)),
            FocusSample::NotFocused(DistractionReason::LookingAway)
        );
    }

    #[test]
    fn test_gaze_rule_needs_bounds_and_iris() {
        let reduced = FocusClassifier::new(&EngineConfig::default());
        assert!(reduced.classify(&metrics(0.03, 0.5, Some(0.1))).is_focused());

        let full = FocusClassifier::new(&EngineConfig::default().with_gaze(0.35, 0.65));
        assert_eq!(
            full.classify(&metrics(0.03, 0.5, Some(0.1))),
            FocusSample::NotFocused(DistractionReason::GazeOffTarget)
        );
        assert!(full.classify(&metrics(0.03, 0.5, None)).is_focused());
        assert!(full.classify(&metrics(0.03, 0.5, Some(0.5))).is_focused());
    }

    #[test]
    fn test_empty_window_is_focused() {
        let classifier = FocusClassifier::new(&EngineConfig::default());
        assert_eq!(classifier.state(), DisciplineState::Focused);
    }

    #[test]
    fn test_four_of_eight_is_distracted() {
        let mut classifier = FocusClassifier::new(&EngineConfig::default());
        let mut state = DisciplineState::Focused;
        for sample in [
            FocusSample::Focused,
            not_focused(),
            FocusSample::Focused,
            not_focused(),
            FocusSample::Focused,
            not_focused(),
            FocusSample::Focused,
            not_focused(),
        ] {
            state = classifier.smooth(sample);
        }
        assert_eq!(
            state,
            DisciplineState::Distracted(DistractionReason::LookingAway)
        );
    }

    #[test]
    fn test_three_of_eight_is_focused() {
        let mut classifier = FocusClassifier::new(&EngineConfig::default());
        for _ in 0..5 {
            classifier.smooth(FocusSample::Focused);
        }
        let mut state = DisciplineState::Focused;
        for _ in 0..3 {
            state = classifier.smooth(not_focused());
        }
        assert!((classifier.buffer().fraction_not_focused() - 0.375).abs() < 1e-12);
        assert_eq!(state, DisciplineState::Focused);
    }

    #[test]
    fn test_single_bad_frame_in_empty_window_flips() {
        // 1/1 = 1.0 >= 0.4: with no history a lone sample decides
        let mut classifier = FocusClassifier::new(&EngineConfig::default());
        assert!(classifier.smooth(not_focused()).is_distracted());
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        assert_eq!(SmoothingBuffer::new(0).capacity(), 1);
    }

    #[test]
    fn test_buffer_evicts_oldest() {
        let mut buffer = SmoothingBuffer::new(3);
        buffer.push(not_focused());
        buffer.push(FocusSample::Focused);
        buffer.push(FocusSample::Focused);
        buffer.push(FocusSample::Focused);
        assert_eq!(buffer.len(), buffer.capacity());
        assert_eq!(buffer.fraction_not_focused(), 0.0);
        assert!(buffer.latest_reason().is_none());
    }

    #[test]
    fn test_reason_follows_latest_bad_sample() {
        let mut classifier = FocusClassifier::new(&EngineConfig::default());
        classifier.smooth(FocusSample::NotFocused(DistractionReason::EyesClosed));
        let state = classifier.smooth(FocusSample::NotFocused(DistractionReason::LeftDesk));
        assert_eq!(state.reason(), Some(DistractionReason::LeftDesk));
    }

    #[test]
    fn test_reset_clears_window() {
        let mut classifier = FocusClassifier::new(&EngineConfig::default());
        classifier.smooth(not_focused());
        classifier.reset();
        assert!(classifier.buffer().is_empty());
        assert_eq!(classifier.state(), DisciplineState::Focused);
    }
}
