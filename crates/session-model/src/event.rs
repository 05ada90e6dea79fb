//! Engine output events.
//!
//! Events are the only thing a session hands to the outside world. Senders
//! (network, speech, UI, persistence) subscribe to them; the engine never
//! waits on what they do with one.

use serde::{Deserialize, Serialize};

use crate::landmark::{ExtractionError, ExtractionErrorKind};
use crate::state::{DisciplineState, DistractionReason};
use crate::TimestampNs;

/// A single decision made by a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineEvent {
    /// Timestamp of the input that produced the event.
    #[serde(rename = "t")]
    pub timestamp_ns: TimestampNs,

    /// The event payload.
    #[serde(flatten)]
    pub kind: EventKind,
}

/// Discriminated union of event types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// The debounced state crossed between focused and distracted.
    StateChanged {
        from: DisciplineState,
        to: DisciplineState,
        /// Reason entered (when becoming distracted) or left behind.
        reason: DistractionReason,
    },

    /// A distraction passed the cooldown gate; senders should intervene.
    DistractionTrigger { reason: DistractionReason },

    /// The user came back after a triggered distraction.
    RecoveryObserved {
        /// Seconds between the trigger and the recovery edge.
        seconds: f64,
    },

    /// The focus streak reached a multiple of the praise interval.
    StreakMilestone { streak_seconds: u64 },

    /// A frame was dropped because metrics could not be extracted.
    ExtractionError {
        kind: ExtractionErrorKind,
        message: String,
    },
}

impl EngineEvent {
    pub fn state_changed(
        timestamp_ns: TimestampNs,
        from: DisciplineState,
        to: DisciplineState,
        reason: DistractionReason,
    ) -> Self {
        Self {
            timestamp_ns,
            kind: EventKind::StateChanged { from, to, reason },
        }
    }

    pub fn distraction_trigger(timestamp_ns: TimestampNs, reason: DistractionReason) -> Self {
        Self {
            timestamp_ns,
            kind: EventKind::DistractionTrigger { reason },
        }
    }

    pub fn recovery_observed(timestamp_ns: TimestampNs, seconds: f64) -> Self {
        Self {
            timestamp_ns,
            kind: EventKind::RecoveryObserved { seconds },
        }
    }

    pub fn streak_milestone(timestamp_ns: TimestampNs, streak_seconds: u64) -> Self {
        Self {
            timestamp_ns,
            kind: EventKind::StreakMilestone { streak_seconds },
        }
    }

    pub fn extraction_error(timestamp_ns: TimestampNs, error: &ExtractionError) -> Self {
        Self {
            timestamp_ns,
            kind: EventKind::ExtractionError {
                kind: error.kind(),
                message: error.to_string(),
            },
        }
    }

    /// Short event name for logs and counters.
    pub fn name(&self) -> &'static str {
        match self.kind {
            EventKind::StateChanged { .. } => "state_changed",
            EventKind::DistractionTrigger { .. } => "distraction_trigger",
            EventKind::RecoveryObserved { .. } => "recovery_observed",
            EventKind::StreakMilestone { .. } => "streak_milestone",
            EventKind::ExtractionError { .. } => "extraction_error",
        }
    }

    pub fn is_trigger(&self) -> bool {
        matches!(self.kind, EventKind::DistractionTrigger { .. })
    }
}

/// Serialize events to JSONL.
pub fn serialize_events(events: &[EngineEvent]) -> Result<String, serde_json::Error> {
    let mut out = String::new();
    for event in events {
        out.push_str(&serde_json::to_string(event)?);
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::ReferenceSpan;

    #[test]
    fn test_trigger_json_format() {
        let event = EngineEvent::distraction_trigger(3_000_000_000, DistractionReason::EyesClosed);
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"t":3000000000,"type":"distraction_trigger","reason":"eyes_closed"}"#
        );
        assert!(event.is_trigger());
    }

    #[test]
    fn test_state_changed_json_format() {
        let event = EngineEvent::state_changed(
            0,
            DisciplineState::Focused,
            DisciplineState::Distracted(DistractionReason::LeftDesk),
            DistractionReason::LeftDesk,
        );
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"t":0,"type":"state_changed","from":{"status":"focused"},"to":{"status":"distracted","reason":"left_desk"},"reason":"left_desk"}"#
        );
    }

    #[test]
    fn test_extraction_error_event_keeps_message() {
        let err = ExtractionError::DegenerateGeometry {
            span: ReferenceSpan::Cheeks,
        };
        let event = EngineEvent::extraction_error(42, &err);
        assert_eq!(event.name(), "extraction_error");
        match event.kind {
            EventKind::ExtractionError { kind, message } => {
                assert_eq!(kind, ExtractionErrorKind::DegenerateGeometry);
                assert!(message.contains("cheek"));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_serialize_events_one_per_line() {
        let events = vec![
            EngineEvent::streak_milestone(30_000_000_000, 30),
            EngineEvent::recovery_observed(31_000_000_000, 4.0),
        ];
        let jsonl = serialize_events(&events).unwrap();
        let lines: Vec<&str> = jsonl.lines().collect();
        assert_eq!(lines.len(), 2);
        let back: EngineEvent = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(back, events[1]);
    }
}
