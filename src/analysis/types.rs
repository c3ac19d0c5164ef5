//! Type definitions for interpreted analyses.
//!
//! `RawClassification` is what the classifier hands back; `Analysis` is the
//! immutable record kept in session history.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::MindCareError;

/// Emotional state labels the classifier can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmotionalState {
    Normal,
    Depression,
    Anxiety,
    Stress,
    Anger,
    Happy,
    Excited,
    Proud,
    Content,
}

impl EmotionalState {
    pub const ALL: [EmotionalState; 9] = [
        EmotionalState::Normal,
        EmotionalState::Depression,
        EmotionalState::Anxiety,
        EmotionalState::Stress,
        EmotionalState::Anger,
        EmotionalState::Happy,
        EmotionalState::Excited,
        EmotionalState::Proud,
        EmotionalState::Content,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionalState::Normal => "Normal",
            EmotionalState::Depression => "Depression",
            EmotionalState::Anxiety => "Anxiety",
            EmotionalState::Stress => "Stress",
            EmotionalState::Anger => "Anger",
            EmotionalState::Happy => "Happy",
            EmotionalState::Excited => "Excited",
            EmotionalState::Proud => "Proud",
            EmotionalState::Content => "Content",
        }
    }

    /// Positive-affect labels get their severity relabeled for display.
    pub fn is_positive(&self) -> bool {
        matches!(
            self,
            EmotionalState::Happy
                | EmotionalState::Excited
                | EmotionalState::Proud
                | EmotionalState::Content
        )
    }
}

impl fmt::Display for EmotionalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmotionalState {
    type Err = MindCareError;

    /// Case-insensitive match against the declared label set. Unknown labels
    /// are an error rather than a fallback to `Normal`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        EmotionalState::ALL
            .into_iter()
            .find(|state| state.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| MindCareError::Validation(format!("unknown emotional state '{}'", s)))
    }
}

/// Severity tier derived from classifier confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Moderate,
    High,
}

impl Severity {
    /// Confidence above this is `High`.
    pub const HIGH_THRESHOLD: f64 = 0.8;
    /// Confidence above this (and not above `HIGH_THRESHOLD`) is `Moderate`.
    pub const MODERATE_THRESHOLD: f64 = 0.6;

    /// Map a confidence value to a tier. Boundary values fall to the lower tier.
    pub fn from_confidence(confidence: f64) -> Severity {
        if confidence > Self::HIGH_THRESHOLD {
            Severity::High
        } else if confidence > Self::MODERATE_THRESHOLD {
            Severity::Moderate
        } else {
            Severity::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Moderate => "Moderate",
            Severity::High => "High",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw classifier output before interpretation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawClassification {
    /// 1 = depression indicators, 0 = normal
    pub prediction: i64,
    /// Classifier confidence, expected in [0, 1]
    pub confidence: f64,
    /// Free-text rationale from the backend
    pub explanation: String,
}

/// Result of interpreting a raw classification.
#[derive(Debug, Clone, PartialEq)]
pub struct Interpretation {
    pub emotional_state: EmotionalState,
    pub severity: Severity,
    pub confidence: f64,
    pub explanation: String,
}

/// One completed analysis, as kept in session history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub id: i64,
    /// Trimmed input text that was submitted
    pub input: String,
    pub emotional_state: EmotionalState,
    pub severity: Severity,
    pub confidence: f64,
    pub explanation: String,
    pub timestamp: DateTime<Utc>,
    /// Backend-assigned id used to correlate feedback
    pub server_analysis_id: Option<String>,
}

impl Analysis {
    pub(crate) fn new(
        id: i64,
        input: String,
        interpretation: Interpretation,
        timestamp: DateTime<Utc>,
        server_analysis_id: Option<String>,
    ) -> Self {
        Self {
            id,
            input,
            emotional_state: interpretation.emotional_state,
            severity: interpretation.severity,
            confidence: interpretation.confidence,
            explanation: interpretation.explanation,
            timestamp,
            server_analysis_id,
        }
    }
}
