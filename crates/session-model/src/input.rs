//! Session input records.
//!
//! A recorded session is an append-only JSONL stream: one input per line,
//! `#`-prefixed lines are comments. Frames, ticks and visibility changes
//! share one timeline so a replay serializes them exactly as a live
//! session would.

use serde::{Deserialize, Serialize};

use crate::landmark::LandmarkFrame;
use crate::TimestampNs;

/// A single timestamped input to a focus session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInput {
    /// Monotonic nanoseconds since session start.
    #[serde(rename = "t")]
    pub timestamp_ns: TimestampNs,

    /// The input payload.
    #[serde(flatten)]
    pub kind: InputKind,
}

/// Discriminated union of input types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputKind {
    /// The detector found a face.
    Frame {
        /// Full landmark list for the face.
        landmarks: LandmarkFrame,
    },

    /// The detector ran but found no face.
    NoFace,

    /// Wall-clock tick (1 Hz) driving streak accounting.
    Tick,

    /// The monitored surface is no longer in the foreground.
    VisibilityLost,
}

impl SessionInput {
    pub fn frame(timestamp_ns: TimestampNs, landmarks: LandmarkFrame) -> Self {
        Self {
            timestamp_ns,
            kind: InputKind::Frame { landmarks },
        }
    }

    pub fn no_face(timestamp_ns: TimestampNs) -> Self {
        Self {
            timestamp_ns,
            kind: InputKind::NoFace,
        }
    }

    pub fn tick(timestamp_ns: TimestampNs) -> Self {
        Self {
            timestamp_ns,
            kind: InputKind::Tick,
        }
    }

    pub fn visibility_lost(timestamp_ns: TimestampNs) -> Self {
        Self {
            timestamp_ns,
            kind: InputKind::VisibilityLost,
        }
    }

    /// Timestamp as fractional seconds since session start.
    pub fn timestamp_secs(&self) -> f64 {
        self.timestamp_ns as f64 / 1_000_000_000.0
    }

    pub fn is_tick(&self) -> bool {
        matches!(self.kind, InputKind::Tick)
    }
}

/// A line of a session input stream that failed to parse.
#[derive(Debug, thiserror::Error)]
#[error("line {line}: {source}")]
pub struct InputParseError {
    /// One-based line number in the source text.
    pub line: usize,
    #[source]
    pub source: serde_json::Error,
}

/// Parse inputs from JSONL content (one JSON object per line).
pub fn parse_inputs(jsonl: &str) -> Result<Vec<SessionInput>, InputParseError> {
    jsonl
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line, text)| {
            serde_json::from_str(text).map_err(|source| InputParseError { line, source })
        })
        .collect()
}

/// Serialize inputs to JSONL.
pub fn serialize_inputs(inputs: &[SessionInput]) -> Result<String, serde_json::Error> {
    let mut out = String::new();
    for input in inputs {
        out.push_str(&serde_json::to_string(input)?);
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::Point3;

    #[test]
    fn test_tick_json_format() {
        let json = serde_json::to_string(&SessionInput::tick(1_000_000_000)).unwrap();
        assert_eq!(json, r#"{"t":1000000000,"type":"tick"}"#);
    }

    #[test]
    fn test_frame_json_format() {
        let frame = LandmarkFrame::new(vec![Point3::new(0.5, 0.25, 0.0)]);
        let json = serde_json::to_string(&SessionInput::frame(5, frame)).unwrap();
        assert_eq!(json, r#"{"t":5,"type":"frame","landmarks":[[0.5,0.25,0.0]]}"#);
    }

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let content = "# focusguard session v1\n\n{\"t\":0,\"type\":\"no_face\"}\n{\"t\":10,\"type\":\"visibility_lost\"}\n";
        let inputs = parse_inputs(content).unwrap();
        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[0].kind, InputKind::NoFace);
        assert_eq!(inputs[1].kind, InputKind::VisibilityLost);
        assert_eq!(inputs[1].timestamp_ns, 10);
    }

    #[test]
    fn test_parse_reports_line_number() {
        let content = "# header\n{\"t\":0,\"type\":\"tick\"}\n{\"t\":1,\"type\":\"blink\"}\n";
        let err = parse_inputs(content).unwrap_err();
        assert_eq!(err.line, 3);
    }

    #[test]
    fn test_jsonl_roundtrip() {
        let inputs = vec![
            SessionInput::no_face(0),
            SessionInput::tick(1_000_000_000),
            SessionInput::visibility_lost(1_500_000_000),
        ];
        let jsonl = serialize_inputs(&inputs).unwrap();
        assert_eq!(jsonl.lines().count(), 3);
        assert_eq!(parse_inputs(&jsonl).unwrap(), inputs);
    }

    #[test]
    fn test_timestamp_secs() {
        let input = SessionInput::tick(2_500_000_000);
        assert!((input.timestamp_secs() - 2.5).abs() < 1e-12);
        assert!(input.is_tick());
    }
}
