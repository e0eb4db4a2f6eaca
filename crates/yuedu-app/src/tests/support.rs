//! Scripted AI service and an event-loop harness without a UI.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use kanal::AsyncReceiver;
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use yuedu_ai::{ChatError, ChatRequest, ChatResponse, ChatService, ProviderMetadata};
use yuedu_config::Config;
use yuedu_io::{BackendClient, SessionStore};
use yuedu_lang_chinese::ChineseTutor;
use yuedu_types::{AppEvent, PopupView, Rect, TermClick};

use crate::events::{EventContext, handle_events};
use crate::state::AppState;

/// Replies per term; a term with a gate waits until the gate is opened
pub struct ScriptedChat {
    pub ready: AtomicBool,
    pub calls: AtomicUsize,
    pub warm_ups: AtomicUsize,
    rate_limited: bool,
    replies: HashMap<String, Result<String, String>>,
    gates: HashMap<String, Arc<Semaphore>>,
}

impl ScriptedChat {
    pub fn new() -> Self {
        Self {
            ready: AtomicBool::new(true),
            calls: AtomicUsize::new(0),
            warm_ups: AtomicUsize::new(0),
            rate_limited: false,
            replies: HashMap::new(),
            gates: HashMap::new(),
        }
    }

    pub fn reply(mut self, term: &str, definition: &str) -> Self {
        self.replies.insert(
            term.to_string(),
            Ok(format!(
                "1. Pinyin: {term}-pinyin\n2. Definition: {definition}\n3. Example sentence: 例句{term}。"
            )),
        );
        self
    }

    pub fn fail(mut self, term: &str, message: &str) -> Self {
        self.replies.insert(term.to_string(), Err(message.to_string()));
        self
    }

    pub fn gated(mut self, term: &str) -> Self {
        self.gates.insert(term.to_string(), Arc::new(Semaphore::new(0)));
        self
    }

    pub fn not_ready(self) -> Self {
        self.ready.store(false, Ordering::SeqCst);
        self
    }

    /// Never ready; every warm-up answers 429
    pub fn rate_limited(mut self) -> Self {
        self.rate_limited = true;
        self.not_ready()
    }

    pub fn open(&self, term: &str) {
        if let Some(gate) = self.gates.get(term) {
            gate.add_permits(1);
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn warm_ups(&self) -> usize {
        self.warm_ups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatService for ScriptedChat {
    fn ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    async fn warm_up(&self) -> Result<(), ChatError> {
        self.warm_ups.fetch_add(1, Ordering::SeqCst);
        if self.rate_limited {
            return Err(ChatError::RateLimitExceeded);
        }
        Ok(())
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ChatError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let prompt: String = request
            .to_messages()
            .into_iter()
            .map(|m| m.content)
            .collect();

        let (term, reply) = self
            .replies
            .iter()
            .find(|(term, _)| prompt.contains(term.as_str()))
            .ok_or_else(|| ChatError::ApiError("no scripted reply".to_string()))?;

        if let Some(gate) = self.gates.get(term) {
            let _permit = gate.acquire().await.expect("gate closed");
        }

        match reply {
            Ok(text) => Ok(ChatResponse::from_content(text.clone())),
            Err(message) => Err(ChatError::ApiError(message.clone())),
        }
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "scripted".to_string(),
            requires_api_key: false,
        }
    }
}

pub struct Harness {
    pub ctx: EventContext,
    pub ui_rx: AsyncReceiver<AppEvent>,
    pub loop_rx: AsyncReceiver<AppEvent>,
}

impl Harness {
    pub fn new(chat: Arc<ScriptedChat>) -> Self {
        let config = Config::default();
        let (ui_tx, ui_rx) = kanal::unbounded_async();
        let (loop_tx, loop_rx) = kanal::unbounded_async();

        let ctx = EventContext::new(
            Arc::new(AppState::new(config.clone())),
            Arc::new(ChineseTutor::new(chat)),
            Arc::new(BackendClient::new(config.backend).expect("backend client")),
            SessionStore::in_memory(),
            ui_tx,
            loop_tx,
            CancellationToken::new(),
        );

        Self { ctx, ui_rx, loop_rx }
    }

    pub async fn send(&mut self, event: AppEvent) {
        handle_events(&mut self.ctx, event).await.expect("handle event");
    }

    /// Feed the next event spawned tasks sent back into the loop
    pub async fn pump(&mut self) {
        let event = timeout(Duration::from_secs(2), self.loop_rx.recv())
            .await
            .expect("timed out waiting for loopback event")
            .expect("loopback closed");
        self.send(event).await;
    }

    /// Next UI event, skipping status updates
    pub async fn next_ui(&self) -> AppEvent {
        loop {
            let event = timeout(Duration::from_secs(2), self.ui_rx.recv())
                .await
                .expect("timed out waiting for ui event")
                .expect("ui channel closed");
            if !matches!(event, AppEvent::StatusUpdate { .. }) {
                return event;
            }
        }
    }

    pub async fn next_popup(&self) -> PopupView {
        match self.next_ui().await {
            AppEvent::ShowPopup(view) => view,
            other => panic!("expected popup, got {other:?}"),
        }
    }

    /// UI events still queued, status updates excluded
    pub fn pending_ui(&self) -> Vec<AppEvent> {
        let mut events = Vec::new();
        while let Ok(Some(event)) = self.ui_rx.try_recv() {
            if !matches!(event, AppEvent::StatusUpdate { .. }) {
                events.push(event);
            }
        }
        events
    }
}

pub fn click(term: &str, key: &str, line: &str) -> TermClick {
    TermClick {
        term: term.to_string(),
        occurrence_key: key.to_string(),
        line: line.to_string(),
        anchor: Rect::new(10.0, 20.0, 4.0, 1.0),
    }
}
