use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use mindcare::api::{AnalysisBackend, AnalyzeResponse, ApiError, FeedbackRequest};
use mindcare::user::StaticUserId;
use mindcare::{
    AnalysisSession, EmotionalState, FeedbackRelay, MindCareError, SessionState, Severity,
};

/// In-memory backend that replays queued responses and records calls.
#[derive(Default)]
struct ScriptedBackend {
    responses: Mutex<VecDeque<Result<AnalyzeResponse, ApiError>>>,
    feedback_results: Mutex<VecDeque<Result<(), ApiError>>>,
    analyze_calls: AtomicUsize,
    feedback_sent: Mutex<Vec<FeedbackRequest>>,
    /// When set, `analyze` signals `started` and waits on `release`.
    gate: Option<(Arc<Notify>, Arc<Notify>)>,
}

impl ScriptedBackend {
    fn new() -> Self {
        Self::default()
    }

    fn gated(started: Arc<Notify>, release: Arc<Notify>) -> Self {
        Self {
            gate: Some((started, release)),
            ..Self::default()
        }
    }

    fn push(&self, response: Result<AnalyzeResponse, ApiError>) -> &Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    fn push_ok(&self, prediction: i64, confidence: f64, analysis_id: Option<&str>) -> &Self {
        self.push(Ok(response(prediction, confidence, analysis_id)))
    }

    fn push_feedback(&self, result: Result<(), ApiError>) {
        self.feedback_results.lock().unwrap().push_back(result);
    }

    fn calls(&self) -> usize {
        self.analyze_calls.load(Ordering::SeqCst)
    }

    fn feedback(&self) -> Vec<FeedbackRequest> {
        self.feedback_sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnalysisBackend for ScriptedBackend {
    async fn analyze(&self, _text: &str) -> Result<AnalyzeResponse, ApiError> {
        self.analyze_calls.fetch_add(1, Ordering::SeqCst);
        if let Some((started, release)) = &self.gate {
            started.notify_one();
            release.notified().await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Network("no scripted response".to_string())))
    }

    async fn submit_feedback(&self, feedback: &FeedbackRequest) -> Result<(), ApiError> {
        self.feedback_sent.lock().unwrap().push(feedback.clone());
        self.feedback_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(()))
    }
}

fn response(prediction: i64, confidence: f64, analysis_id: Option<&str>) -> AnalyzeResponse {
    AnalyzeResponse {
        prediction,
        confidence,
        ai_response: format!("explanation for {}", confidence),
        analysis_id: analysis_id.map(str::to_string),
        probabilities: None,
    }
}

fn http_failure() -> ApiError {
    ApiError::Status {
        status: 500,
        message: "Internal server error: model unavailable".to_string(),
    }
}

// =============================================================================
// Input validation
// =============================================================================

#[tokio::test]
async fn test_too_short_input_never_reaches_backend() {
    let backend = Arc::new(ScriptedBackend::new());
    let session = AnalysisSession::new(backend.clone());

    let err = session.submit("hi").await.unwrap_err();
    assert!(matches!(err, MindCareError::TooShort { len: 2, min: 5 }));
    assert_eq!(backend.calls(), 0);
    assert_eq!(session.state(), SessionState::Idle);
}

#[tokio::test]
async fn test_blank_input_is_empty_error() {
    let backend = Arc::new(ScriptedBackend::new());
    let session = AnalysisSession::new(backend.clone());

    assert!(matches!(
        session.submit("   \n\t ").await,
        Err(MindCareError::EmptyInput)
    ));
    assert!(matches!(session.submit("").await, Err(MindCareError::EmptyInput)));
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn test_length_is_measured_after_trimming() {
    let backend = Arc::new(ScriptedBackend::new());
    let session = AnalysisSession::new(backend.clone());

    let err = session.submit("   abcd   ").await.unwrap_err();
    assert!(matches!(err, MindCareError::TooShort { len: 4, .. }));

    backend.push_ok(0, 0.3, None);
    let analysis = session.submit("  abcde  ").await.unwrap();
    assert_eq!(analysis.input, "abcde");
}

// =============================================================================
// Successful submissions and history
// =============================================================================

#[tokio::test]
async fn test_successful_submission_is_interpreted_and_recorded() {
    let backend = Arc::new(ScriptedBackend::new());
    backend.push_ok(1, 0.95, Some("srv-1"));
    let session = AnalysisSession::new(backend.clone());

    let analysis = session.submit("I can't get out of bed lately").await.unwrap();

    assert_eq!(analysis.emotional_state, EmotionalState::Depression);
    assert_eq!(analysis.severity, Severity::High);
    assert_eq!(analysis.confidence, 0.95);
    assert_eq!(analysis.explanation, "explanation for 0.95");
    assert_eq!(analysis.server_analysis_id.as_deref(), Some("srv-1"));
    assert_eq!(session.most_recent(), Some(analysis.clone()));
    assert_eq!(session.view(analysis.id), Some(analysis));
    assert_eq!(session.state(), SessionState::Idle);
}

#[tokio::test]
async fn test_three_submissions_listed_newest_first() {
    let backend = Arc::new(ScriptedBackend::new());
    backend
        .push_ok(0, 0.5, None)
        .push_ok(1, 0.7, None)
        .push_ok(1, 0.9, None);
    let session = AnalysisSession::new(backend.clone());

    let first = session.submit("first message here").await.unwrap();
    let second = session.submit("second message here").await.unwrap();
    let third = session.submit("third message here").await.unwrap();

    let history = session.history();
    assert_eq!(history, vec![third.clone(), second.clone(), first.clone()]);
    assert_eq!(session.most_recent(), Some(third.clone()));

    assert!(first.id < second.id && second.id < third.id, "ids must be unique and increasing");
    assert_eq!(
        history.iter().map(|a| a.severity).collect::<Vec<_>>(),
        vec![Severity::High, Severity::Moderate, Severity::Low]
    );
}

#[tokio::test]
async fn test_clear_history_twice() {
    let backend = Arc::new(ScriptedBackend::new());
    backend.push_ok(0, 0.2, None).push_ok(0, 0.2, None);
    let session = AnalysisSession::new(backend.clone());
    session.submit("some entry one").await.unwrap();
    session.submit("some entry two").await.unwrap();

    assert!(!session.clear_history(|| false));
    assert_eq!(session.history_len(), 2);

    assert!(session.clear_history(|| true));
    assert!(session.most_recent().is_none());
    assert!(session.clear_history(|| true));
    assert!(session.history().is_empty());
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_http_failure_leaves_history_and_recovers() {
    let backend = Arc::new(ScriptedBackend::new());
    backend
        .push_ok(0, 0.4, None)
        .push(Err(http_failure()))
        .push_ok(1, 0.65, None);
    let session = AnalysisSession::new(backend.clone());

    session.submit("a calm afternoon").await.unwrap();
    let before = session.history_len();

    let err = session.submit("this one will fail").await.unwrap_err();
    match &err {
        MindCareError::AnalysisFailed(msg) => {
            assert_eq!(msg, "Internal server error: model unavailable")
        }
        other => panic!("expected AnalysisFailed, got {:?}", other),
    }
    assert_eq!(session.history_len(), before);
    assert!(!session.is_submitting());
    assert!(matches!(session.state(), SessionState::Failed { .. }));

    let recovered = session.submit("trying again now").await.unwrap();
    assert_eq!(recovered.severity, Severity::Moderate);
    assert_eq!(session.history_len(), before + 1);
    assert_eq!(session.state(), SessionState::Idle);
}

#[tokio::test]
async fn test_malformed_payload_is_analysis_failed() {
    let backend = Arc::new(ScriptedBackend::new());
    backend.push(Err(ApiError::Malformed("missing field `confidence`".to_string())));
    let session = AnalysisSession::new(backend.clone());

    let err = session.submit("hello there world").await.unwrap_err();
    assert!(matches!(err, MindCareError::AnalysisFailed(_)));
    assert!(session.history().is_empty());
}

#[tokio::test]
async fn test_out_of_range_classifier_output_is_validation_error() {
    let backend = Arc::new(ScriptedBackend::new());
    backend
        .push_ok(1, 1.7, None)
        .push_ok(3, 0.5, None)
        .push_ok(0, 0.1, None);
    let session = AnalysisSession::new(backend.clone());

    assert!(matches!(
        session.submit("out of range one").await,
        Err(MindCareError::Validation(_))
    ));
    assert!(matches!(
        session.submit("out of range two").await,
        Err(MindCareError::Validation(_))
    ));
    assert!(session.history().is_empty());
    assert!(!session.is_submitting());

    assert!(session.submit("valid this time").await.is_ok());
}

// =============================================================================
// Concurrency guard
// =============================================================================

#[tokio::test]
async fn test_overlapping_submit_is_rejected() {
    let started = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let backend = Arc::new(ScriptedBackend::gated(started.clone(), release.clone()));
    backend.push_ok(1, 0.85, Some("srv-9"));
    let session = AnalysisSession::new(backend.clone());

    let first = session.submit("the original submission");
    let second = async {
        started.notified().await;
        assert!(session.is_submitting());
        assert_eq!(session.state(), SessionState::Submitting);
        let rejected = session.submit("an overlapping submission").await;
        release.notify_one();
        rejected
    };

    let (first, second) = tokio::join!(first, second);

    assert!(matches!(second, Err(MindCareError::AlreadyInProgress)));
    let analysis = first.unwrap();
    assert_eq!(analysis.input, "the original submission");
    assert_eq!(analysis.severity, Severity::High);
    assert_eq!(backend.calls(), 1);
    assert_eq!(session.history(), vec![analysis]);
    assert!(!session.is_submitting());
}

#[tokio::test]
async fn test_abandoned_submission_releases_flag() {
    let started = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let backend = Arc::new(ScriptedBackend::gated(started.clone(), release.clone()));
    backend.push_ok(0, 0.3, None).push_ok(0, 0.3, None);
    let session = AnalysisSession::new(backend.clone());

    let timed_out =
        tokio::time::timeout(Duration::from_millis(50), session.submit("never finishes")).await;
    assert!(timed_out.is_err());
    assert!(!session.is_submitting());
    assert_eq!(session.state(), SessionState::Idle);
    assert!(session.history().is_empty());

    release.notify_one();
    assert!(session.submit("finishes this time").await.is_ok());
}

#[tokio::test]
async fn test_state_transitions_are_published() {
    let backend = Arc::new(ScriptedBackend::new());
    backend.push_ok(0, 0.5, None).push(Err(http_failure()));
    let session = Arc::new(AnalysisSession::new(backend.clone()));
    let mut rx = session.subscribe();
    assert_eq!(*rx.borrow_and_update(), SessionState::Idle);

    session.submit("good submission").await.unwrap();
    assert!(rx.has_changed().unwrap());
    assert_eq!(*rx.borrow_and_update(), SessionState::Idle);

    session.submit("bad submission").await.unwrap_err();
    let state = rx.borrow_and_update().clone();
    match state {
        SessionState::Failed { message } => assert!(message.contains("model unavailable")),
        other => panic!("expected Failed, got {:?}", other),
    }
}

// =============================================================================
// Feedback
// =============================================================================

#[tokio::test]
async fn test_feedback_without_history_is_rejected() {
    let backend = Arc::new(ScriptedBackend::new());
    let session = Arc::new(AnalysisSession::new(backend.clone()));
    let relay = FeedbackRelay::new(session, Arc::new(StaticUserId("user_1_abc".to_string())));

    let err = relay.send(true).await.unwrap_err();
    assert!(matches!(err, MindCareError::NoAnalysisAvailable));
    assert!(backend.feedback().is_empty());
}

#[tokio::test]
async fn test_feedback_requires_server_id() {
    let backend = Arc::new(ScriptedBackend::new());
    backend.push_ok(0, 0.4, None);
    let session = Arc::new(AnalysisSession::new(backend.clone()));
    session.submit("no server id here").await.unwrap();
    let relay = FeedbackRelay::new(session, Arc::new(StaticUserId("user_1_abc".to_string())));

    assert!(matches!(
        relay.send(false).await,
        Err(MindCareError::NoAnalysisAvailable)
    ));
    assert!(backend.feedback().is_empty());
}

#[tokio::test]
async fn test_feedback_targets_most_recent_analysis() {
    let backend = Arc::new(ScriptedBackend::new());
    backend
        .push_ok(0, 0.4, Some("srv-old"))
        .push_ok(1, 0.9, Some("srv-new"));
    let session = Arc::new(AnalysisSession::new(backend.clone()));
    session.submit("older analysis text").await.unwrap();
    session.submit("newer analysis text").await.unwrap();

    let relay = FeedbackRelay::new(
        session.clone(),
        Arc::new(StaticUserId("user_1700000000000_k3j9x0abc".to_string())),
    );
    relay.send(true).await.unwrap();

    assert_eq!(
        backend.feedback(),
        vec![FeedbackRequest {
            analysis_id: "srv-new".to_string(),
            helpful: true,
            user_id: "user_1700000000000_k3j9x0abc".to_string(),
        }]
    );
}

#[tokio::test]
async fn test_feedback_failure_leaves_state_alone() {
    let backend = Arc::new(ScriptedBackend::new());
    backend.push_ok(1, 0.7, Some("srv-7"));
    backend.push_feedback(Err(ApiError::Network("connection reset".to_string())));
    let session = Arc::new(AnalysisSession::new(backend.clone()));
    let analysis = session.submit("something to rate").await.unwrap();
    let relay = FeedbackRelay::new(session.clone(), Arc::new(StaticUserId("u".to_string())));

    let err = relay.send(false).await.unwrap_err();
    assert!(matches!(err, MindCareError::FeedbackFailed(_)));
    assert_eq!(session.history(), vec![analysis]);
    assert_eq!(session.state(), SessionState::Idle);

    relay.send(false).await.unwrap();
    assert_eq!(backend.feedback().len(), 2);
}
