//! Presentation lookups for front ends: icons, labels, previews.
//!
//! None of this affects interpretation; it only decides how an `Analysis`
//! is shown.

use crate::analysis::{EmotionalState, Severity};
use crate::error::MindCareError;

const HISTORY_PREVIEW_CHARS: usize = 100;

pub fn state_icon(state: EmotionalState) -> &'static str {
    match state {
        EmotionalState::Happy => "😊",
        EmotionalState::Excited => "🤩",
        EmotionalState::Proud => "😎",
        EmotionalState::Content => "😌",
        EmotionalState::Normal => "😐",
        EmotionalState::Depression => "😞",
        EmotionalState::Anxiety => "😰",
        EmotionalState::Stress => "😤",
        EmotionalState::Anger => "😡",
    }
}

/// Severity label as shown to the user. Positive states read as intensity
/// (Mild / Strong / Very Strong) rather than severity.
pub fn severity_label(severity: Severity, state: EmotionalState) -> &'static str {
    if state.is_positive() {
        match severity {
            Severity::Low => "Mild",
            Severity::Moderate => "Strong",
            Severity::High => "Very Strong",
        }
    } else {
        severity.as_str()
    }
}

/// Confidence as a whole percentage, e.g. 0.876 -> 88.
pub fn confidence_percent(confidence: f64) -> u8 {
    (confidence.clamp(0.0, 1.0) * 100.0).round() as u8
}

/// First 100 characters of the input, with an ellipsis when cut.
pub fn history_preview(input: &str) -> String {
    let mut preview: String = input.chars().take(HISTORY_PREVIEW_CHARS).collect();
    if input.chars().count() > HISTORY_PREVIEW_CHARS {
        preview.push_str("...");
    }
    preview
}

/// Status line shown after a feedback attempt.
pub fn feedback_status(result: &Result<(), MindCareError>) -> &'static str {
    match result {
        Ok(()) => "Thanks for your feedback!",
        Err(MindCareError::NoAnalysisAvailable) => "Analyze something first",
        Err(_) => "Failed to send feedback",
    }
}
