use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{debug, warn};

use mindcare::display::{
    confidence_percent, feedback_status, history_preview, severity_label, state_icon,
};
use mindcare::resources::{crisis_resources, recommendations_for, Resource};
use mindcare::user::{generate_user_id, FileUserIdProvider, StaticUserId, UserIdProvider};
use mindcare::{Analysis, AnalysisSession, ClientConfig, FeedbackRelay, HttpBackend};

const HELP: &str = "\
Type a few sentences about how you feel and press Enter to analyze them.

Commands:
  :history      list past analyses (newest first)
  :view <id>    show a past analysis again
  :clear        clear history (asks for confirmation)
  :good / :bad  rate the latest analysis
  :crisis       show crisis resources
  :help         show this message
  :quit         exit";

#[tokio::main]
async fn main() -> Result<()> {
    mindcare::init_tracing();

    let config = ClientConfig::load().context("Failed to load configuration")?;
    let backend = Arc::new(HttpBackend::new(&config).context("Failed to create API client")?);

    match backend.health().await {
        Ok(status) if status.is_healthy() => {}
        Ok(status) => warn!(
            "Backend at {} reports status '{}'",
            backend.base_url(),
            status.status
        ),
        Err(e) => warn!("Backend at {} failed health check: {}", backend.base_url(), e),
    }

    let session = Arc::new(AnalysisSession::with_config(backend, &config));
    let feedback = FeedbackRelay::new(session.clone(), user_id_provider(&config));

    println!("MindCare AI\n\n{}\n", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line.split_once(' ').map_or((line, ""), |(cmd, rest)| (cmd, rest.trim())) {
            ("", _) => continue,
            (":quit", _) | (":q", _) => break,
            (":help", _) => println!("{}", HELP),
            (":crisis", _) => print_resources("Crisis resources", crisis_resources()),
            (":history", _) => print_history(&session),
            (":view", arg) => match arg.parse::<i64>().ok().and_then(|id| session.view(id)) {
                Some(analysis) => print_analysis(&analysis),
                None => println!("No analysis with id '{}'", arg),
            },
            (":clear", _) => {
                let confirmed = confirm(&mut lines).await?;
                if session.clear_history(|| confirmed) {
                    println!("History cleared.");
                }
            }
            (":good", _) | (":bad", _) => {
                let result = feedback.send(line.starts_with(":good")).await;
                println!("{}", feedback_status(&result));
            }
            _ => match session.submit(line).await {
                Ok(analysis) => print_analysis(&analysis),
                Err(e) => println!("Error: {}", e),
            },
        }
    }

    Ok(())
}

fn user_id_provider(config: &ClientConfig) -> Arc<dyn UserIdProvider> {
    let stored = config
        .user_id_file()
        .map(|path| FileUserIdProvider::load_or_create(&path));
    match stored {
        Some(Ok(provider)) => {
            debug!("User id loaded from {:?}", provider.path());
            Arc::new(provider)
        }
        Some(Err(e)) => {
            warn!("{}; using a temporary user id", e);
            Arc::new(StaticUserId(generate_user_id()))
        }
        None => Arc::new(StaticUserId(generate_user_id())),
    }
}

async fn confirm(lines: &mut Lines<BufReader<Stdin>>) -> Result<bool> {
    println!("Are you sure you want to clear your analysis history? [y/N]");
    let answer = lines.next_line().await?.unwrap_or_default();
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn print_analysis(analysis: &Analysis) {
    println!();
    println!(
        "#{}  analyzed {}",
        analysis.id,
        analysis.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!(
        "Emotional state: {} {}",
        state_icon(analysis.emotional_state),
        analysis.emotional_state
    );
    println!(
        "Severity:        {}",
        severity_label(analysis.severity, analysis.emotional_state)
    );
    println!("Confidence:      {}%", confidence_percent(analysis.confidence));
    println!("\n{}\n", analysis.explanation);
    print_resources("Recommended resources", recommendations_for(analysis.severity));
}

fn print_resources(heading: &str, resources: &[Resource]) {
    println!("{}:", heading);
    for resource in resources {
        println!(
            "  [{}] {} - {} ({})",
            resource.kind.label(),
            resource.title,
            resource.description,
            resource.url
        );
    }
    println!();
}

fn print_history(session: &AnalysisSession) {
    let history = session.history();
    if history.is_empty() {
        println!("No previous analyses yet. Start by sharing your thoughts above.");
        return;
    }
    for analysis in history {
        println!(
            "#{}  {}  {:<8} {:<10} {}",
            analysis.id,
            analysis.timestamp.format("%Y-%m-%d"),
            severity_label(analysis.severity, analysis.emotional_state),
            analysis.emotional_state,
            history_preview(&analysis.input)
        );
    }
}
