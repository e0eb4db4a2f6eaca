use std::sync::Arc;
use std::time::Duration;

use kanal::{AsyncReceiver, AsyncSender};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use yuedu_io::{BackendClient, SessionStore};
use yuedu_lang_chinese::ChineseTutor;
use yuedu_types::AppEvent;

use crate::events::{EventContext, event_loop};
use crate::io::readiness_watcher;
use crate::state::AppState;
use crate::ui::ui_loop;

/// Centralized channel management
pub struct ChannelSet {
    pub app_to_ui: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    /// User input plus results coming back from spawned tasks
    pub ui_to_app: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            app_to_ui: kanal::bounded_async(64),
            ui_to_app: kanal::bounded_async(64),
        }
    }
}

impl Default for ChannelSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    state: Arc<AppState>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            channels: ChannelSet::new(),
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    /// Sender into the event loop
    pub fn app_sender(&self) -> AsyncSender<AppEvent> {
        self.channels.ui_to_app.0.clone()
    }

    pub fn spawn_tasks(
        &self,
        tutor: Arc<ChineseTutor>,
        backend: Arc<BackendClient>,
        session: SessionStore,
        readiness_interval: Duration,
    ) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();

        // Event loop
        let context = EventContext::new(
            self.state.clone(),
            tutor.clone(),
            backend,
            session,
            self.channels.app_to_ui.0.clone(),
            self.channels.ui_to_app.0.clone(),
            self.cancel_token.child_token(),
        );
        tasks.spawn(event_loop(context, self.channels.ui_to_app.1.clone()));

        // UI loop
        tasks.spawn(ui_loop(
            self.channels.app_to_ui.1.clone(),
            self.channels.ui_to_app.0.clone(),
            self.state.config.clone(),
        ));

        // AI readiness
        tasks.spawn(readiness_watcher(
            tutor.chat().clone(),
            readiness_interval,
            self.cancel_token.child_token(),
            self.channels.ui_to_app.0.clone(),
        ));

        tasks
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
