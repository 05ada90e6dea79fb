//! End-of-session report card.

use serde::{Deserialize, Serialize};

/// Letter grade derived from how many interventions a session needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "F")]
    F,
    #[serde(rename = "D-")]
    DMinus,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "A+")]
    APlus,
}

impl Grade {
    /// Every two triggers cost one grade step, starting from A+.
    pub fn from_trigger_count(trigger_count: u64) -> Self {
        let score = 4u64.saturating_sub(trigger_count / 2);
        match score {
            4 => Self::APlus,
            3 => Self::B,
            2 => Self::C,
            1 => Self::DMinus,
            _ => Self::F,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::F => "F",
            Self::DMinus => "D-",
            Self::C => "C",
            Self::B => "B",
            Self::APlus => "A+",
        }
    }

    pub fn verdict(&self) -> &'static str {
        match self {
            Self::F => "Disgraceful.",
            Self::DMinus => "Barely conscious.",
            Self::C => "Mediocre.",
            Self::B => "Not bad.",
            Self::APlus => "Absolute machine.",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Statistics handed to the persistence collaborator when a session stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Time between the first and last input (seconds).
    pub duration_secs: f64,

    /// Distraction triggers that passed the cooldown gate.
    pub trigger_count: u64,

    /// Focused→distracted edges, including cooldown-suppressed ones.
    pub distraction_count: u64,

    /// Number of recovery samples collected.
    pub recovery_count: usize,

    /// Mean recovery time, if any recovery was observed.
    pub average_recovery_secs: Option<f64>,

    /// Longest uninterrupted focus streak (seconds).
    pub longest_streak_secs: u64,

    /// Frames dropped because metrics could not be extracted.
    pub dropped_frames: u64,

    pub grade: Grade,
}

impl SessionSummary {
    /// One-line report card, e.g. `Grade: B. Not bad.`
    pub fn verdict_line(&self) -> String {
        format!("Grade: {}. {}", self.grade, self.grade.verdict())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_steps() {
        assert_eq!(Grade::from_trigger_count(0), Grade::APlus);
        assert_eq!(Grade::from_trigger_count(1), Grade::APlus);
        assert_eq!(Grade::from_trigger_count(2), Grade::B);
        assert_eq!(Grade::from_trigger_count(5), Grade::C);
        assert_eq!(Grade::from_trigger_count(6), Grade::DMinus);
        assert_eq!(Grade::from_trigger_count(8), Grade::F);
        assert_eq!(Grade::from_trigger_count(1_000), Grade::F);
    }

    #[test]
    fn test_grade_serializes_as_label() {
        assert_eq!(serde_json::to_string(&Grade::DMinus).unwrap(), r#""D-""#);
        assert_eq!(serde_json::to_string(&Grade::APlus).unwrap(), r#""A+""#);
    }

    #[test]
    fn test_verdict_line() {
        let summary = SessionSummary {
            duration_secs: 600.0,
            trigger_count: 3,
            distraction_count: 4,
            recovery_count: 3,
            average_recovery_secs: Some(5.5),
            longest_streak_secs: 240,
            dropped_frames: 0,
            grade: Grade::from_trigger_count(3),
        };
        assert_eq!(summary.verdict_line(), "Grade: B. Not bad.");
    }
}
