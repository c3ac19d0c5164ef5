use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, info, warn};
use url::Url;

use super::types::{AnalyzeRequest, AnalyzeResponse, ErrorBody, FeedbackRequest, HealthStatus};
use super::{AnalysisBackend, ApiError};
use crate::config::ClientConfig;
use crate::error::{MindCareError, Result};

/// reqwest-backed client for the analysis service.
///
/// Endpoints, relative to the configured base URL:
/// - `POST analyze`
/// - `POST api/feedback`
/// - `GET health`
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpBackend {
    /// Build a client from config. Timeout and User-Agent apply to every request.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = config.base_url()?;
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| MindCareError::Config(format!("Failed to build HTTP client: {}", e)))?;

        info!("Analysis backend at {}", base_url);
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> std::result::Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::Network(format!("Invalid endpoint '{}': {}", path, e)))
    }

    /// Query the backend health endpoint.
    pub async fn health(&self) -> std::result::Result<HealthStatus, ApiError> {
        let url = self.endpoint("health")?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::Network(format!("Health check failed: {}", e)))?;

        let status = response.status();
        let body = read_body(response).await?;
        if !status.is_success() {
            return Err(status_error(status, &body));
        }
        serde_json::from_str(&body).map_err(|e| ApiError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl AnalysisBackend for HttpBackend {
    async fn analyze(&self, text: &str) -> std::result::Result<AnalyzeResponse, ApiError> {
        let url = self.endpoint("analyze")?;
        debug!("POST {} ({} chars)", url, text.chars().count());

        let response = self
            .client
            .post(url)
            .json(&AnalyzeRequest {
                text: text.to_string(),
            })
            .send()
            .await
            .map_err(|e| ApiError::Network(format!("Failed to reach analysis service: {}", e)))?;

        let status = response.status();
        let body = read_body(response).await?;
        if !status.is_success() {
            let err = status_error(status, &body);
            warn!("Analyze request rejected: {}", err);
            return Err(err);
        }
        parse_analyze_body(&body)
    }

    async fn submit_feedback(&self, feedback: &FeedbackRequest) -> std::result::Result<(), ApiError> {
        let url = self.endpoint("api/feedback")?;
        debug!("POST {} for analysis {}", url, feedback.analysis_id);

        let response = self
            .client
            .post(url)
            .json(feedback)
            .send()
            .await
            .map_err(|e| ApiError::Network(format!("Failed to reach feedback service: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = read_body(response).await.unwrap_or_default();
            return Err(status_error(status, &body));
        }
        Ok(())
    }
}

async fn read_body(response: reqwest::Response) -> std::result::Result<String, ApiError> {
    response
        .text()
        .await
        .map_err(|e| ApiError::Network(format!("Failed to read response body: {}", e)))
}

const GENERIC_FAILURE: &str = "Analysis request failed";

/// Build an error from a non-success response.
///
/// A JSON body contributes its `error` field, or the generic failure message
/// when that field is missing or blank. Only a non-JSON body falls back to
/// the status reason.
fn status_error(status: StatusCode, body: &str) -> ApiError {
    let message = match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed
            .error
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
        Err(_) => status
            .canonical_reason()
            .unwrap_or(GENERIC_FAILURE)
            .to_string(),
    };
    ApiError::Status {
        status: status.as_u16(),
        message,
    }
}

fn parse_analyze_body(body: &str) -> std::result::Result<AnalyzeResponse, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Malformed(e.to_string()))
}
