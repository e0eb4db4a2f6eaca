use std::time::Duration;

use yuedu_io::{PollControl, SessionKey, spawn_poller};
use yuedu_types::{AnnotationStatus, AppEvent};

use super::EventContext;
use super::session::show_stored_article;

/// Poll the backend task until it completes or fails. Replaces (and so
/// stops) any poller already running. Progress is tagged with the current
/// submission.
pub async fn start_status_poller(ctx: &mut EventContext, task_id: String) {
    let period = {
        let config = ctx.state.config.read().await;
        Duration::from_millis(config.backend.status_interval_ms)
    };

    let submission = ctx.submission;
    let backend = ctx.backend.clone();
    let tx = ctx.loopback_tx.clone();

    let handle = spawn_poller(period, ctx.cancel.child_token(), move || {
        let backend = backend.clone();
        let tx = tx.clone();
        let task_id = task_id.clone();
        async move {
            let status = match backend.annotation_status(&task_id).await {
                Ok(status) => status,
                Err(e) => {
                    tracing::warn!("Status check for task {task_id} failed: {e}");
                    AnnotationStatus::Failed {
                        error: e.to_string(),
                    }
                }
            };

            let done = status.is_terminal();
            let event = AppEvent::AnnotationProgress { submission, status };
            if let Err(e) = tx.send(event).await {
                tracing::error!("Failed to send annotation progress: {e}");
                return PollControl::Stop;
            }

            if done {
                PollControl::Stop
            } else {
                PollControl::Continue
            }
        }
    });

    ctx.status_poller = Some(handle);
}

pub async fn handle_annotation_progress(
    ctx: &mut EventContext,
    status: AnnotationStatus,
) -> anyhow::Result<()> {
    match status {
        AnnotationStatus::Pending => {
            tracing::debug!("Annotation still pending");
            ctx.status("Annotating on server...", true).await?;
        }
        AnnotationStatus::Completed { annotated_text } => {
            tracing::info!("Annotation task completed");
            ctx.status_poller = None;
            ctx.remember(SessionKey::AnnotatedWorkText, annotated_text);
            ctx.forget(SessionKey::AnnotationTaskId);
            show_stored_article(ctx).await?;
        }
        AnnotationStatus::Failed { error } => {
            tracing::error!("Annotation task failed: {error}");
            ctx.status_poller = None;
            ctx.forget(SessionKey::AnnotationTaskId);
            ctx.to_ui(AppEvent::InputError(format!("Annotation failed: {error}")))
                .await?;
            ctx.status("Annotation failed", false).await?;
        }
    }

    Ok(())
}
