pub mod analysis;
pub mod api;
pub mod config;
pub mod display;
mod error;
pub mod feedback;
pub mod history;
pub mod resources;
pub mod session;
pub mod user;

pub use analysis::{Analysis, EmotionalState, Severity};
pub use api::{AnalysisBackend, HttpBackend};
pub use config::ClientConfig;
pub use error::{MindCareError, Result};
pub use feedback::FeedbackRelay;
pub use session::{AnalysisSession, SessionState};

/// Install the global tracing subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
