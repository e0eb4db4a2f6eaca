use kanal::AsyncSender;
use yuedu_types::AppEvent;

use crate::input::{Command, HELP};
use crate::state::UiState;

/// What the UI loop does after handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Apply an event coming from the app side
pub fn handle_app_event(state: &mut UiState, event: AppEvent) -> Flow {
    match event {
        AppEvent::ShowArticle(content) => {
            tracing::debug!("[UI] Showing article: {} chars", content.len());
            state.show_article(&content);
        }
        AppEvent::ShowPopup(view) => {
            tracing::debug!("[UI] Popup {:?} for '{}'", view.phase(), view.term);
            state.show_popup(view);
        }
        AppEvent::HidePopup => state.hide_popup(),
        AppEvent::InputError(message) => state.message = Some(message),
        AppEvent::StatusUpdate { status, busy } => {
            state.status = status;
            state.busy = busy;
        }
        AppEvent::AiReady => {
            tracing::debug!("[UI] AI ready");
            state.ai_ready = true;
        }
        AppEvent::Quit => return Flow::Exit,
        _ => {}
    }
    Flow::Continue
}

/// Turn a typed command into app events
pub async fn handle_command(
    state: &mut UiState,
    command: Command,
    ui_to_app_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<Flow> {
    state.message = None;

    match command {
        Command::Click(number) => match state.click(number) {
            Some(click) => ui_to_app_tx.send(AppEvent::TermClicked(click)).await?,
            None => state.message = Some(format!("No term numbered {number}")),
        },
        Command::Open(url) => ui_to_app_tx.send(AppEvent::SubmitUrl(url)).await?,
        Command::Close => ui_to_app_tx.send(AppEvent::ClosePopup).await?,
        Command::Resume => ui_to_app_tx.send(AppEvent::ResumeSession).await?,
        Command::Quit => {
            ui_to_app_tx.send(AppEvent::Quit).await?;
            return Ok(Flow::Exit);
        }
        Command::Redraw => {}
        Command::Next => state.page(1),
        Command::Prev => state.page(-1),
        Command::Help => state.message = Some(HELP.to_string()),
        Command::Unknown(text) => state.message = Some(format!("Unknown command: {text}")),
    }
    Ok(Flow::Continue)
}
