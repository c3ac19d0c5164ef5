use super::types::{EmotionalState, Interpretation, RawClassification, Severity};
use crate::error::{MindCareError, Result};

/// Map a raw classifier response onto an emotional state and severity tier.
///
/// Pure: the same input always yields the same interpretation.
///
/// # Errors
/// `MindCareError::Validation` when `confidence` is not a finite number in
/// [0, 1] or `prediction` is not 0 or 1.
pub fn interpret(raw: &RawClassification) -> Result<Interpretation> {
    if !raw.confidence.is_finite() || !(0.0..=1.0).contains(&raw.confidence) {
        return Err(MindCareError::Validation(format!(
            "confidence must be within [0, 1], got {}",
            raw.confidence
        )));
    }

    let emotional_state = match raw.prediction {
        1 => EmotionalState::Depression,
        0 => EmotionalState::Normal,
        other => {
            return Err(MindCareError::Validation(format!(
                "prediction must be 0 or 1, got {}",
                other
            )))
        }
    };

    Ok(Interpretation {
        emotional_state,
        severity: Severity::from_confidence(raw.confidence),
        confidence: raw.confidence,
        explanation: raw.explanation.clone(),
    })
}
