//! Discipline state and distraction reasons.

use serde::{Deserialize, Serialize};

/// Why the user is considered distracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistractionReason {
    /// Eyelid gap below the closed-eye threshold.
    EyesClosed,
    /// Head turned outside the yaw bounds.
    LookingAway,
    /// Irises outside the on-screen gaze bounds.
    GazeOffTarget,
    /// No face in the camera image.
    LeftDesk,
    /// The monitored surface lost foreground visibility.
    SwitchedAway,
}

impl DistractionReason {
    /// Human-readable reason, as handed to speech and notification sinks.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EyesClosed => "eyes closed",
            Self::LookingAway => "looking away",
            Self::GazeOffTarget => "gaze off-target",
            Self::LeftDesk => "left desk",
            Self::SwitchedAway => "switched away",
        }
    }
}

impl std::fmt::Display for DistractionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Debounced output of the focus classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum DisciplineState {
    #[default]
    Focused,
    Distracted(DistractionReason),
}

impl DisciplineState {
    pub fn is_focused(&self) -> bool {
        matches!(self, Self::Focused)
    }

    pub fn is_distracted(&self) -> bool {
        !self.is_focused()
    }

    pub fn reason(&self) -> Option<DistractionReason> {
        match self {
            Self::Focused => None,
            Self::Distracted(reason) => Some(*reason),
        }
    }

    /// Classify the move from `self` to `next`. Changing reasons while
    /// staying distracted is not an edge.
    pub fn edge_to(&self, next: &DisciplineState) -> Option<StateEdge> {
        match (self, next) {
            (Self::Focused, Self::Distracted(reason)) => Some(StateEdge::BecameDistracted(*reason)),
            (Self::Distracted(reason), Self::Focused) => Some(StateEdge::Recovered(*reason)),
            _ => None,
        }
    }
}

impl std::fmt::Display for DisciplineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Focused => f.write_str("focused"),
            Self::Distracted(reason) => write!(f, "distracted ({reason})"),
        }
    }
}

/// A transition between the two discipline states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateEdge {
    /// Focused to distracted, with the new reason.
    BecameDistracted(DistractionReason),
    /// Distracted to focused, with the reason being left behind.
    Recovered(DistractionReason),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_focused() {
        assert_eq!(DisciplineState::default(), DisciplineState::Focused);
        assert!(DisciplineState::default().reason().is_none());
    }

    #[test]
    fn test_edges_are_structural() {
        let focused = DisciplineState::Focused;
        let closed = DisciplineState::Distracted(DistractionReason::EyesClosed);
        let away = DisciplineState::Distracted(DistractionReason::LookingAway);

        assert_eq!(
            focused.edge_to(&closed),
            Some(StateEdge::BecameDistracted(DistractionReason::EyesClosed))
        );
        assert_eq!(
            closed.edge_to(&focused),
            Some(StateEdge::Recovered(DistractionReason::EyesClosed))
        );
        assert_eq!(closed.edge_to(&away), None);
        assert_eq!(focused.edge_to(&focused), None);
    }

    #[test]
    fn test_state_json_format() {
        let json =
            serde_json::to_string(&DisciplineState::Distracted(DistractionReason::LeftDesk))
                .unwrap();
        assert_eq!(json, r#"{"status":"distracted","reason":"left_desk"}"#);
        let json = serde_json::to_string(&DisciplineState::Focused).unwrap();
        assert_eq!(json, r#"{"status":"focused"}"#);
    }

    #[test]
    fn test_reason_text() {
        assert_eq!(DistractionReason::GazeOffTarget.to_string(), "gaze off-target");
        assert_eq!(
            DisciplineState::Distracted(DistractionReason::SwitchedAway).to_string(),
            "distracted (switched away)"
        );
    }
}
