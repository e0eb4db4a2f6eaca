use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::signal;
use yuedu_ai::{ChatService, OpenAiChat};
use yuedu_config::Config;
use yuedu_core::MarkerPair;
use yuedu_io::BackendClient;
use yuedu_lang_chinese::{ChineseTutor, PromptTemplate};
use yuedu_types::AppEvent;

mod controller;
mod events;
mod io;
mod profile;
mod state;
mod ui;

#[cfg(test)]
mod tests;

use controller::AppController;
use state::AppState;

/// Read Chinese articles with on-demand term lookups
#[derive(Parser, Debug)]
#[command(name = "yuedu", version)]
struct Args {
    /// Article URL to fetch and annotate
    url: Option<String>,

    /// Reopen the article from the last session
    #[arg(long, conflicts_with = "url")]
    resume: bool,

    /// Profile name under the user config directory
    #[arg(long, default_value = "main")]
    profile: String,

    /// Plain config JSON file, overrides the profile
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // stdout belongs to the reader view
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => profile::load_config_file(path)?,
        None => {
            if let Err(e) = profile::init_user_config() {
                tracing::warn!("Failed to initialize user config: {e}");
            }
            profile::load_user_profile(&args.profile)?
        }
    };
    config.apply_env();

    let tutor = Arc::new(build_tutor(&config));
    let backend = Arc::new(BackendClient::new(config.backend.clone())?);
    let session = state::open_session(&config);
    let readiness_interval = Duration::from_millis(config.ai.readiness_interval_ms);

    let state = Arc::new(AppState::new(config));
    let controller = AppController::new(state);
    let mut tasks = controller.spawn_tasks(tutor, backend, session, readiness_interval);

    let first = match (args.url, args.resume) {
        (Some(url), _) => Some(AppEvent::SubmitUrl(url)),
        (None, true) => Some(AppEvent::ResumeSession),
        (None, false) => None,
    };
    if let Some(event) = first {
        controller.app_sender().send(event).await?;
    }

    tokio::select! {
        _ = signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
        }
        Some(result) = tasks.join_next() => {
            match result {
                Ok(Ok(())) => tracing::info!("Task finished, shutting down"),
                Ok(Err(e)) => tracing::error!("Task failed: {e}"),
                Err(e) => tracing::error!("Task panicked: {e}"),
            }
        }
    }

    controller.shutdown();
    tasks.shutdown().await;

    Ok(())
}

fn build_tutor(config: &Config) -> ChineseTutor {
    let chat: Arc<dyn ChatService> = Arc::new(OpenAiChat::new(
        config.ai.api_url.clone(),
        config.ai.api_key.clone(),
        config.ai.model.clone(),
    ));

    let mut tutor = ChineseTutor::new(chat)
        .with_markers(MarkerPair::new(&config.ui.start_marker, &config.ui.end_marker))
        .with_article_model(config.ai.article_model.clone());

    if let Some(template) = load_prompt(config.ai.lookup_prompt_path.as_deref()) {
        tutor = tutor.with_lookup_prompt(template);
    }
    if let Some(template) = load_prompt(config.ai.article_prompt_path.as_deref()) {
        tutor = tutor.with_article_prompt(template);
    }

    tutor
}

/// Prompt override from disk; the built-in prompt stays on failure
fn load_prompt(path: Option<&str>) -> Option<PromptTemplate> {
    let path = Path::new(path?);
    match PromptTemplate::from_file(path) {
        Ok(template) => {
            tracing::info!("Loaded prompt {}", path.display());
            Some(template)
        }
        Err(e) => {
            tracing::error!("Failed to read prompt {}: {e}", path.display());
            None
        }
    }
}
