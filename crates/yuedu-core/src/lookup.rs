//! Term click handling and the popup state machine.
//!
//! The controller never performs I/O. A click either resolves immediately
//! (cache hit, AI unavailable) or hands back a [`LookupRequest`] for the
//! caller to run; the result comes back through [`LookupController::complete`].
//!
//! Overlapping lookups are resolved last-writer-wins: every fetch gets a
//! fresh [`RequestToken`], and a completion is applied only while its token
//! is still the active one. Superseded requests are not aborted, their
//! results are just dropped on arrival.

use yuedu_types::{PopupPhase, PopupView, RequestToken, TermClick, TermInfo};

use crate::cache::TermCache;

pub const AI_UNAVAILABLE: &str = "AI service initializing or not available.";

/// What the caller has to do after a click
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// Popup filled from cache
    Cached,
    /// Popup shows the AI-unavailable error
    Unavailable,
    /// Popup is loading; run this lookup and report back
    Fetch(LookupRequest),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LookupRequest {
    pub token: RequestToken,
    pub term: String,
    pub line: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// A newer click superseded this request
    Stale,
}

#[derive(Debug, Default)]
pub struct LookupController {
    cache: TermCache,
    popup: PopupView,
    generation: u64,
    active: Option<RequestToken>,
}

impl LookupController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn popup(&self) -> &PopupView {
        &self.popup
    }

    pub fn phase(&self) -> PopupPhase {
        self.popup.phase()
    }

    pub fn cache(&self) -> &TermCache {
        &self.cache
    }

    pub fn active_token(&self) -> Option<&RequestToken> {
        self.active.as_ref()
    }

    pub fn click(&mut self, click: TermClick, ai_ready: bool) -> ClickOutcome {
        let TermClick {
            term,
            occurrence_key,
            line,
            anchor,
        } = click;

        if let Some(cached) = self.cache.get(&occurrence_key).cloned() {
            tracing::debug!("Cache hit for occurrence {occurrence_key}");
            self.active = None;
            self.popup = PopupView {
                term,
                pinyin: cached.pinyin,
                definition: cached.definition,
                example: cached.example,
                loading: false,
                error: None,
                anchor: Some(anchor),
                occurrence_key: Some(occurrence_key),
            };
            return ClickOutcome::Cached;
        }

        if !ai_ready {
            tracing::warn!("AI service not ready, lookup for '{term}' skipped");
            self.active = None;
            self.popup = PopupView {
                term,
                error: Some(AI_UNAVAILABLE.to_string()),
                anchor: Some(anchor),
                occurrence_key: Some(occurrence_key),
                ..PopupView::default()
            };
            return ClickOutcome::Unavailable;
        }

        self.generation += 1;
        let token = RequestToken {
            occurrence_key: occurrence_key.clone(),
            generation: self.generation,
        };
        self.active = Some(token.clone());
        self.popup = PopupView {
            term: term.clone(),
            loading: true,
            anchor: Some(anchor),
            occurrence_key: Some(occurrence_key),
            ..PopupView::default()
        };

        ClickOutcome::Fetch(LookupRequest { token, term, line })
    }

    pub fn complete(
        &mut self,
        token: &RequestToken,
        outcome: Result<TermInfo, String>,
    ) -> Completion {
        if self.active.as_ref() != Some(token) {
            tracing::debug!(
                "Stale lookup ignored for occurrence {} (generation {})",
                token.occurrence_key,
                token.generation
            );
            return Completion::Stale;
        }
        self.active = None;

        match outcome {
            Ok(info) => {
                self.cache.insert(token.occurrence_key.clone(), info.clone());
                self.popup.pinyin = info.pinyin;
                self.popup.definition = info.definition;
                self.popup.example = info.example;
                self.popup.error = None;
            }
            Err(message) => {
                let message = if message.is_empty() {
                    "Unknown error".to_string()
                } else {
                    message
                };
                self.popup.error = Some(format!("Failed to fetch info: {message}"));
                self.popup.pinyin = None;
                self.popup.definition = None;
                self.popup.example = None;
            }
        }
        self.popup.loading = false;

        Completion::Applied
    }

    /// Hide the popup. Cached lookups are kept.
    pub fn close(&mut self) {
        self.popup = PopupView::default();
        self.active = None;
    }
}
