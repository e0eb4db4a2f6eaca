use yuedu_core::lookup::AI_UNAVAILABLE;
use yuedu_io::{SessionKey, validate_article_url};
use yuedu_types::{AppEvent, Submission};

use super::EventContext;
use super::annotation::start_status_poller;
use super::session::show_stored_article;

/// Validate the URL, then hand it to the backend on a task
pub async fn handle_submit_url(ctx: &mut EventContext, input: String) -> anyhow::Result<()> {
    let url = match validate_article_url(&input, &ctx.backend.config().allowed_prefix) {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!("Rejected URL '{input}': {e}");
            return ctx.to_ui(AppEvent::InputError(e.to_string())).await;
        }
    };

    let submission = ctx.next_submission();
    tracing::info!("Submitting {url} (submission {submission})");
    for key in [
        SessionKey::AnnotatedWorkText,
        SessionKey::ArticleContent,
        SessionKey::ArticleTitle,
        SessionKey::EntireArticle,
        SessionKey::AnnotationTaskId,
    ] {
        ctx.forget(key);
    }
    ctx.status("Processing...", true).await?;

    let backend = ctx.backend.clone();
    let tx = ctx.loopback_tx.clone();
    tokio::spawn(async move {
        let outcome = backend.process_url(&url).await.map_err(|e| {
            tracing::warn!("process-url failed: {e}");
            e.to_string()
        });
        let event = AppEvent::SubmitFinished {
            submission,
            outcome,
        };
        if let Err(e) = tx.send(event).await {
            tracing::error!("Failed to send submit result: {e}");
        }
    });

    Ok(())
}

pub async fn handle_submit_finished(
    ctx: &mut EventContext,
    outcome: Result<Submission, String>,
) -> anyhow::Result<()> {
    match outcome {
        Err(message) => {
            ctx.to_ui(AppEvent::InputError(message)).await?;
            ctx.status("Enter an article URL", false).await?;
        }
        Ok(Submission::Task { task_id }) => {
            tracing::info!("Backend annotation task {task_id} started");
            ctx.remember(SessionKey::AnnotationTaskId, task_id.clone());
            start_status_poller(ctx, task_id).await;
            ctx.status("Annotating on server...", true).await?;
        }
        Ok(Submission::Extracted { title, text }) => {
            tracing::info!("Extracted article: {} chars", text.chars().count());
            ctx.remember(SessionKey::EntireArticle, text.clone());
            if let Some(title) = title {
                ctx.remember(SessionKey::ArticleTitle, title);
            }

            if !ctx.tutor.is_ready() {
                tracing::warn!("AI service not ready, article left unannotated");
                ctx.to_ui(AppEvent::InputError(AI_UNAVAILABLE.to_string()))
                    .await?;
                return ctx.status("Enter an article URL", false).await;
            }

            ctx.status("Annotating article...", true).await?;

            let submission = ctx.submission;
            let tutor = ctx.tutor.clone();
            let tx = ctx.loopback_tx.clone();
            tokio::spawn(async move {
                let outcome = tutor.annotate(&text).await.map_err(|e| {
                    tracing::error!("Article annotation failed: {e}");
                    e.to_string()
                });
                let event = AppEvent::ArticleAnnotated {
                    submission,
                    outcome,
                };
                if let Err(e) = tx.send(event).await {
                    tracing::error!("Failed to send annotation result: {e}");
                }
            });
        }
    }

    Ok(())
}

pub async fn handle_article_annotated(
    ctx: &mut EventContext,
    outcome: Result<String, String>,
) -> anyhow::Result<()> {
    match outcome {
        Ok(annotated) => {
            ctx.remember(SessionKey::ArticleContent, annotated);
            show_stored_article(ctx).await
        }
        Err(message) => {
            ctx.to_ui(AppEvent::InputError(format!("An error occurred: {message}")))
                .await?;
            ctx.status("Enter an article URL", false).await
        }
    }
}
