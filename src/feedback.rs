use std::sync::Arc;

use tracing::{info, warn};

use crate::api::FeedbackRequest;
use crate::error::{MindCareError, Result};
use crate::session::AnalysisSession;
use crate::user::UserIdProvider;

/// Sends helpful/unhelpful signals for the session's latest analysis.
///
/// Feedback is correlated through the backend-assigned analysis id, so the
/// latest analysis must carry one. Failures never touch session state.
pub struct FeedbackRelay {
    session: Arc<AnalysisSession>,
    users: Arc<dyn UserIdProvider>,
}

impl FeedbackRelay {
    pub fn new(session: Arc<AnalysisSession>, users: Arc<dyn UserIdProvider>) -> Self {
        Self { session, users }
    }

    /// # Errors
    /// - `NoAnalysisAvailable` when history is empty or the latest analysis
    ///   has no server id (no request is sent)
    /// - `FeedbackFailed` when the backend call fails
    pub async fn send(&self, helpful: bool) -> Result<()> {
        let analysis_id = self
            .session
            .most_recent()
            .and_then(|a| a.server_analysis_id)
            .ok_or(MindCareError::NoAnalysisAvailable)?;

        let request = FeedbackRequest {
            analysis_id,
            helpful,
            user_id: self.users.user_id(),
        };

        self.session
            .backend()
            .submit_feedback(&request)
            .await
            .map_err(|e| {
                warn!("Feedback for {} failed: {}", request.analysis_id, e);
                MindCareError::FeedbackFailed(e.user_message())
            })?;

        info!(
            "Sent {} feedback for analysis {}",
            if helpful { "helpful" } else { "unhelpful" },
            request.analysis_id
        );
        Ok(())
    }
}
