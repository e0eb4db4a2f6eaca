use std::io::Write;
use std::sync::Arc;

use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use kanal::{AsyncReceiver, AsyncSender};
use tokio::sync::RwLock;
use yuedu_config::Config;
use yuedu_types::AppEvent;

pub mod events;
pub mod input;
pub mod layout;
pub mod popup;
pub mod render;
pub mod state;

use events::{Flow, handle_app_event, handle_command};
use input::{Command, read_commands};
use state::UiState;

/// Terminal reader view. Runs until the user quits, the app sends
/// [`AppEvent::Quit`], or either channel closes.
pub async fn ui_loop(
    app_to_ui_rx: AsyncReceiver<AppEvent>,
    ui_to_app_tx: AsyncSender<AppEvent>,
    config: Arc<RwLock<Config>>,
) -> anyhow::Result<()> {
    let ui_config = config.read().await.ui.clone();
    let viewport = terminal::size().unwrap_or(ui_config.fallback_viewport);
    let mut state = UiState::new(&ui_config, viewport);

    // Blocking reads, detached thread; never joined
    let (command_tx, command_rx) = kanal::bounded::<Command>(16);
    let command_rx = command_rx.to_async();
    std::thread::Builder::new()
        .name("yuedu-stdin".to_string())
        .spawn(move || read_commands(std::io::stdin().lock(), command_tx))?;

    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    render::draw(&mut stdout, &state)?;

    let result = async {
        loop {
            let flow = tokio::select! {
                event = app_to_ui_rx.recv() => handle_app_event(&mut state, event?),
                command = command_rx.recv() => {
                    handle_command(&mut state, command?, &ui_to_app_tx).await?
                }
            };

            if flow == Flow::Exit {
                return Ok::<_, anyhow::Error>(());
            }

            if let Ok((cols, rows)) = terminal::size()
                && (cols as f32, rows as f32) != (state.viewport.width, state.viewport.height)
            {
                state.resize(cols, rows);
            }
            render::draw(&mut stdout, &state)?;
        }
    }
    .await;

    execute!(stdout, LeaveAlternateScreen)?;
    stdout.flush()?;
    tracing::info!("[UI] Reader closed");

    result
}
