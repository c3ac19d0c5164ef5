//! Wire types for the analysis backend.

use serde::{Deserialize, Serialize};

use crate::analysis::RawClassification;

/// Body of `POST /analyze`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
}

/// Successful `/analyze` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub prediction: i64,
    pub confidence: f64,
    /// Rationale and recommendations generated by the backend
    pub ai_response: String,
    /// Present when the backend stores analyses for feedback
    #[serde(default)]
    pub analysis_id: Option<String>,
    /// Per-class probabilities, informational only
    #[serde(default)]
    pub probabilities: Option<Vec<f64>>,
}

impl AnalyzeResponse {
    pub fn classification(&self) -> RawClassification {
        RawClassification {
            prediction: self.prediction,
            confidence: self.confidence,
            explanation: self.ai_response.clone(),
        }
    }
}

/// Body of `POST /api/feedback`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub analysis_id: String,
    pub helpful: bool,
    pub user_id: String,
}

/// Error body returned with non-success statuses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// `GET /health` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}
