use yuedu_core::{LookupController, MarkerPair, strip_markers};
use yuedu_io::SessionKey;
use yuedu_types::AppEvent;

use super::EventContext;
use super::annotation::start_status_poller;

pub const ARTICLE_NOT_FOUND: &str = "Article content not found in session.";

/// Article to display: backend annotation first, then local annotation
pub fn stored_article(ctx: &EventContext) -> String {
    ctx.session
        .get(SessionKey::AnnotatedWorkText)
        .or_else(|| ctx.session.get(SessionKey::ArticleContent))
        .unwrap_or(ARTICLE_NOT_FOUND)
        .to_string()
}

/// Plain article text handed to lookup prompts
pub async fn article_context(ctx: &EventContext) -> String {
    if let Some(raw) = ctx.session.get(SessionKey::EntireArticle) {
        return raw.to_string();
    }

    let markers = {
        let config = ctx.state.config.read().await;
        MarkerPair::new(&config.ui.start_marker, &config.ui.end_marker)
    };
    stored_article(ctx)
        .split('\n')
        .map(|line| strip_markers(line, &markers))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Show whatever article the session holds. Term state starts fresh.
pub async fn show_stored_article(ctx: &mut EventContext) -> anyhow::Result<()> {
    let content = stored_article(ctx);
    tracing::info!("Displaying article ({} chars)", content.chars().count());

    ctx.lookup = LookupController::new();
    ctx.to_ui(AppEvent::ShowArticle(content)).await?;
    ctx.status("Type a term number to look it up", false).await
}

pub async fn handle_resume(ctx: &mut EventContext) -> anyhow::Result<()> {
    let pending_task = ctx.session.get(SessionKey::AnnotatedWorkText).is_none()
        && ctx.session.get(SessionKey::ArticleContent).is_none();

    if pending_task && let Some(task_id) = ctx.session.get(SessionKey::AnnotationTaskId) {
        let task_id = task_id.to_string();
        tracing::info!("Resuming annotation task {task_id}");
        ctx.next_submission();
        start_status_poller(ctx, task_id).await;
        return ctx.status("Annotating on server...", true).await;
    }

    show_stored_article(ctx).await
}
