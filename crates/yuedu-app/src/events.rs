use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use tokio_util::sync::CancellationToken;
use yuedu_core::LookupController;
use yuedu_io::{BackendClient, PollHandle, SessionKey, SessionStore};
use yuedu_lang_chinese::ChineseTutor;
use yuedu_types::AppEvent;

use crate::state::AppState;

pub mod annotation;
pub mod session;
pub mod submit_url;
pub mod term_click;

use annotation::handle_annotation_progress;
use session::handle_resume;
use submit_url::{handle_article_annotated, handle_submit_finished, handle_submit_url};
use term_click::{handle_close_popup, handle_lookup_finished, handle_term_click};

/// Everything the event loop owns
pub struct EventContext {
    pub state: Arc<AppState>,
    pub tutor: Arc<ChineseTutor>,
    pub backend: Arc<BackendClient>,
    pub session: SessionStore,
    pub lookup: LookupController,
    /// Poller for the current backend annotation task, if any
    pub status_poller: Option<PollHandle>,
    /// Bumped on every new submission; results from older ones are stale
    pub submission: u64,
    pub app_to_ui_tx: AsyncSender<AppEvent>,
    /// Sender back into this loop, for spawned tasks
    pub loopback_tx: AsyncSender<AppEvent>,
    pub cancel: CancellationToken,
}

impl EventContext {
    pub fn new(
        state: Arc<AppState>,
        tutor: Arc<ChineseTutor>,
        backend: Arc<BackendClient>,
        session: SessionStore,
        app_to_ui_tx: AsyncSender<AppEvent>,
        loopback_tx: AsyncSender<AppEvent>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            state,
            tutor,
            backend,
            session,
            lookup: LookupController::new(),
            status_poller: None,
            submission: 0,
            app_to_ui_tx,
            loopback_tx,
            cancel,
        }
    }

    pub async fn to_ui(&self, event: AppEvent) -> anyhow::Result<()> {
        self.app_to_ui_tx.send(event).await?;
        Ok(())
    }

    pub async fn status(&self, status: impl Into<String>, busy: bool) -> anyhow::Result<()> {
        self.to_ui(AppEvent::StatusUpdate {
            status: status.into(),
            busy,
        })
        .await
    }

    /// Start a new submission generation, stopping any status poller
    pub fn next_submission(&mut self) -> u64 {
        self.submission += 1;
        self.status_poller = None;
        self.submission
    }

    /// Whether a result belongs to the current submission
    pub fn is_current(&self, submission: u64, what: &str) -> bool {
        if submission == self.submission {
            return true;
        }
        tracing::debug!(
            "Stale {what} ignored (submission {submission}, current {})",
            self.submission
        );
        false
    }

    /// Write a session key, logging instead of failing on I/O errors
    pub fn remember(&mut self, key: SessionKey, value: impl Into<String>) {
        if let Err(e) = self.session.set(key, value) {
            tracing::error!("Failed to store {}: {e}", key.as_str());
        }
    }

    pub fn forget(&mut self, key: SessionKey) {
        if let Err(e) = self.session.remove(key) {
            tracing::error!("Failed to remove {}: {e}", key.as_str());
        }
    }
}

/// App's main loop
pub async fn event_loop(
    mut ctx: EventContext,
    app_rx: AsyncReceiver<AppEvent>,
) -> anyhow::Result<()> {
    tracing::info!("[EVENT_LOOP] Starting main loop, waiting for events");

    loop {
        let event = tokio::select! {
            _ = ctx.cancel.cancelled() => break,
            event = app_rx.recv() => event?,
        };

        tracing::debug!(
            "[EVENT_LOOP] Event received: {:?}",
            std::mem::discriminant(&event)
        );

        if matches!(event, AppEvent::Quit) {
            tracing::info!("[EVENT_LOOP] Quit requested");
            ctx.to_ui(AppEvent::Quit).await.ok();
            break;
        }

        handle_events(&mut ctx, event).await?;
    }

    ctx.status_poller.take();
    Ok(())
}

pub async fn handle_events(ctx: &mut EventContext, event: AppEvent) -> anyhow::Result<()> {
    match event {
        AppEvent::SubmitUrl(input) => handle_submit_url(ctx, input).await?,
        AppEvent::SubmitFinished {
            submission,
            outcome,
        } => {
            if ctx.is_current(submission, "submit result") {
                handle_submit_finished(ctx, outcome).await?
            }
        }
        AppEvent::ArticleAnnotated {
            submission,
            outcome,
        } => {
            if ctx.is_current(submission, "article annotation") {
                handle_article_annotated(ctx, outcome).await?
            }
        }
        AppEvent::ResumeSession => handle_resume(ctx).await?,
        AppEvent::TermClicked(click) => handle_term_click(ctx, click).await?,
        AppEvent::LookupFinished { token, outcome } => {
            handle_lookup_finished(ctx, token, outcome).await?
        }
        AppEvent::ClosePopup => handle_close_popup(ctx).await?,
        AppEvent::AnnotationProgress { submission, status } => {
            if ctx.is_current(submission, "annotation status") {
                handle_annotation_progress(ctx, status).await?
            }
        }
        AppEvent::AiReady => {
            tracing::info!("AI service ready");
            ctx.to_ui(AppEvent::AiReady).await?;
        }
        AppEvent::Quit => {}
        // UI-only events, ignore in backend
        AppEvent::ShowArticle(_)
        | AppEvent::ShowPopup(_)
        | AppEvent::HidePopup
        | AppEvent::InputError(_)
        | AppEvent::StatusUpdate { .. } => {}
    }

    Ok(())
}
