//! Remote collaborators: the analysis backend and its HTTP implementation.
//!
//! The session only sees the `AnalysisBackend` trait, so tests and embedders
//! can swap the transport without touching session logic.

mod http_client;
mod types;

use async_trait::async_trait;
use thiserror::Error;

pub use http_client::HttpBackend;
pub use types::*;

/// Transport-level failures talking to the backend.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    #[error("{0}")]
    Network(String),

    #[error("{message} (HTTP {status})")]
    Status { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl ApiError {
    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Classify `text`. The text is already trimmed and validated.
    async fn analyze(&self, text: &str) -> Result<AnalyzeResponse, ApiError>;

    /// Record a helpful/unhelpful signal for a stored analysis.
    async fn submit_feedback(&self, feedback: &FeedbackRequest) -> Result<(), ApiError>;
}
