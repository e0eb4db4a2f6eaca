use yuedu_core::{ClickOutcome, Completion};
use yuedu_types::{AppEvent, RequestToken, TermClick, TermInfo};

use super::EventContext;
use super::session::article_context;

pub async fn handle_term_click(ctx: &mut EventContext, click: TermClick) -> anyhow::Result<()> {
    tracing::debug!("Term clicked: '{}' ({})", click.term, click.occurrence_key);

    let outcome = ctx.lookup.click(click, ctx.tutor.is_ready());
    ctx.to_ui(AppEvent::ShowPopup(ctx.lookup.popup().clone()))
        .await?;

    if let ClickOutcome::Fetch(request) = outcome {
        let article = article_context(ctx).await;
        let tutor = ctx.tutor.clone();
        let tx = ctx.loopback_tx.clone();

        tokio::spawn(async move {
            let outcome = tutor
                .define(&request.term, &request.line, &article)
                .await
                .map_err(|e| {
                    tracing::error!("Lookup for '{}' failed: {e}", request.term);
                    e.to_string()
                });
            let event = AppEvent::LookupFinished {
                token: request.token,
                outcome,
            };
            if let Err(e) = tx.send(event).await {
                tracing::error!("Failed to send lookup result: {e}");
            }
        });
    }

    Ok(())
}

pub async fn handle_lookup_finished(
    ctx: &mut EventContext,
    token: RequestToken,
    outcome: Result<TermInfo, String>,
) -> anyhow::Result<()> {
    match ctx.lookup.complete(&token, outcome) {
        Completion::Applied => {
            ctx.to_ui(AppEvent::ShowPopup(ctx.lookup.popup().clone()))
                .await
        }
        Completion::Stale => Ok(()),
    }
}

pub async fn handle_close_popup(ctx: &mut EventContext) -> anyhow::Result<()> {
    ctx.lookup.close();
    ctx.to_ui(AppEvent::HidePopup).await
}
