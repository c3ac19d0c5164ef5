//! Analysis session: one submission at a time, results into history.
//!
//! State machine:
//!
//! ```text
//! Idle --submit--> Submitting --ok--> Idle
//!                            \--err-> Failed (idle, last error kept)
//! ```
//!
//! The in-progress flag is the only mutual exclusion. It is set with a
//! compare-and-swap before the backend is called and cleared by a drop guard,
//! so it is released on every exit path, including a dropped future.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::analysis::{interpret, Analysis};
use crate::api::AnalysisBackend;
use crate::config::{ClientConfig, DEFAULT_MIN_INPUT_CHARS};
use crate::error::{MindCareError, Result};
use crate::history::AnalysisHistory;

const LOG_PREVIEW_CHARS: usize = 50;

/// Observable session state, published on every transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Submitting,
    /// Idle after a failed submission; a new submission is allowed.
    Failed { message: String },
}

/// Hands out analysis ids from wall-clock millis, strictly increasing.
#[derive(Debug, Default)]
struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    fn next(&self, at: DateTime<Utc>) -> i64 {
        let candidate = at.timestamp_millis();
        match self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |prev| {
                Some(candidate.max(prev + 1))
            }) {
            Ok(prev) | Err(prev) => candidate.max(prev + 1),
        }
    }
}

pub struct AnalysisSession {
    backend: Arc<dyn AnalysisBackend>,
    history: Mutex<AnalysisHistory>,
    in_progress: AtomicBool,
    state_tx: watch::Sender<SessionState>,
    ids: IdGenerator,
    min_input_chars: usize,
}

impl AnalysisSession {
    pub fn new(backend: Arc<dyn AnalysisBackend>) -> Self {
        let (state_tx, _) = watch::channel(SessionState::Idle);
        Self {
            backend,
            history: Mutex::new(AnalysisHistory::new()),
            in_progress: AtomicBool::new(false),
            state_tx,
            ids: IdGenerator::default(),
            min_input_chars: DEFAULT_MIN_INPUT_CHARS,
        }
    }

    pub fn with_config(backend: Arc<dyn AnalysisBackend>, config: &ClientConfig) -> Self {
        Self {
            min_input_chars: config.min_input_chars.max(1),
            ..Self::new(backend)
        }
    }

    /// Validate, classify and record `text`.
    ///
    /// # Errors
    /// - `EmptyInput` / `TooShort` before any network activity
    /// - `AlreadyInProgress` if another submission is outstanding
    /// - `AnalysisFailed` when the backend call fails or returns garbage
    /// - `Validation` when the classifier output is out of range
    ///
    /// History is only touched on success.
    pub async fn submit(&self, text: &str) -> Result<Analysis> {
        let text = text.trim();
        if text.is_empty() {
            return Err(MindCareError::EmptyInput);
        }
        let len = text.chars().count();
        if len < self.min_input_chars {
            return Err(MindCareError::TooShort {
                len,
                min: self.min_input_chars,
            });
        }

        let mut guard = self.begin_submission()?;
        info!("Starting analysis for text: {}", preview(text));

        let result = self.run_analysis(text).await;
        match &result {
            Ok(analysis) => {
                info!(
                    "Analysis {} complete: {} / {} ({:.2})",
                    analysis.id, analysis.emotional_state, analysis.severity, analysis.confidence
                );
                guard.outcome = SessionState::Idle;
            }
            Err(e) => {
                warn!("Analysis failed: {}", e);
                guard.outcome = SessionState::Failed {
                    message: e.to_string(),
                };
            }
        }
        result
    }

    fn begin_submission(&self) -> Result<SubmissionGuard<'_>> {
        if self
            .in_progress
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(MindCareError::AlreadyInProgress);
        }
        self.state_tx.send_replace(SessionState::Submitting);
        Ok(SubmissionGuard {
            session: self,
            outcome: SessionState::Idle,
        })
    }

    async fn run_analysis(&self, text: &str) -> Result<Analysis> {
        let response = self
            .backend
            .analyze(text)
            .await
            .map_err(|e| MindCareError::AnalysisFailed(e.user_message()))?;

        let interpretation = interpret(&response.classification())?;
        let timestamp = Utc::now();
        let analysis = Analysis::new(
            self.ids.next(timestamp),
            text.to_string(),
            interpretation,
            timestamp,
            response.analysis_id,
        );

        self.lock_history().append(analysis.clone());
        Ok(analysis)
    }

    pub fn is_submitting(&self) -> bool {
        self.in_progress.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> SessionState {
        self.state_tx.borrow().clone()
    }

    /// Receive every state transition from now on.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// Snapshot of the history, newest first.
    pub fn history(&self) -> Vec<Analysis> {
        self.lock_history().all()
    }

    pub fn history_len(&self) -> usize {
        self.lock_history().len()
    }

    pub fn most_recent(&self) -> Option<Analysis> {
        self.lock_history().most_recent()
    }

    /// Look up a past analysis to show it again.
    pub fn view(&self, id: i64) -> Option<Analysis> {
        self.lock_history().find_by_id(id)
    }

    /// Clear history if `confirm` returns true. Returns whether it was cleared.
    pub fn clear_history<F>(&self, confirm: F) -> bool
    where
        F: FnOnce() -> bool,
    {
        if !confirm() {
            info!("History clear cancelled");
            return false;
        }
        self.lock_history().clear();
        true
    }

    pub(crate) fn backend(&self) -> &Arc<dyn AnalysisBackend> {
        &self.backend
    }

    fn lock_history(&self) -> MutexGuard<'_, AnalysisHistory> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clears the in-progress flag and publishes the final state when dropped.
struct SubmissionGuard<'a> {
    session: &'a AnalysisSession,
    outcome: SessionState,
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        self.session.in_progress.store(false, Ordering::SeqCst);
        let outcome = std::mem::replace(&mut self.outcome, SessionState::Idle);
        self.session.state_tx.send_replace(outcome);
    }
}

fn preview(text: &str) -> String {
    let mut out: String = text.chars().take(LOG_PREVIEW_CHARS).collect();
    if text.chars().count() > LOG_PREVIEW_CHARS {
        out.push_str("...");
    }
    out
}
