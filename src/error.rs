use thiserror::Error;

#[derive(Debug, Error)]
pub enum MindCareError {
    #[error("Please enter some text to analyze.")]
    EmptyInput,

    #[error("Please enter at least {min} characters for analysis (got {len}).")]
    TooShort { len: usize, min: usize },

    #[error("An analysis is already in progress")]
    AlreadyInProgress,

    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("Analyze something first")]
    NoAnalysisAvailable,

    #[error("Invalid classifier response: {0}")]
    Validation(String),

    #[error("Failed to send feedback: {0}")]
    FeedbackFailed(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("User id error: {0}")]
    UserId(String),
}

impl From<MindCareError> for String {
    fn from(err: MindCareError) -> Self {
        err.to_string()
    }
}

pub type Result<T> = std::result::Result<T, MindCareError>;
