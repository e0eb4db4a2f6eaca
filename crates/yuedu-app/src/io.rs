use std::sync::Arc;
use std::time::Duration;

use kanal::AsyncSender;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use yuedu_ai::{ChatError, ChatService};
use yuedu_io::{PollControl, spawn_poller};
use yuedu_types::AppEvent;

const FIRST_RETRY: Duration = Duration::from_secs(1);
const MAX_RETRY: Duration = Duration::from_secs(60);

/// When the next warm-up request may go out. Each failure doubles the
/// wait, up to `MAX_RETRY`.
#[derive(Debug)]
struct WarmUpBackoff {
    next_attempt: Instant,
    delay: Duration,
}

impl WarmUpBackoff {
    fn new(now: Instant) -> Self {
        Self {
            next_attempt: now,
            delay: FIRST_RETRY,
        }
    }

    fn due(&self, now: Instant) -> bool {
        now >= self.next_attempt
    }

    fn failed(&mut self, now: Instant) {
        self.next_attempt = now + self.delay;
        self.delay = (self.delay * 2).min(MAX_RETRY);
    }
}

/// Check AI readiness every `interval` and tell the event loop once it is
/// ready. Warm-up requests cost money, so they back off on failure
/// instead of following the interval. Returns on shutdown.
pub async fn readiness_watcher(
    chat: Arc<dyn ChatService>,
    interval: Duration,
    cancel: CancellationToken,
    event_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let name = chat.metadata().name;
    tracing::info!("Waiting for AI service '{name}'");

    let backoff = Arc::new(Mutex::new(WarmUpBackoff::new(Instant::now())));

    let handle = spawn_poller(interval, cancel.clone(), move || {
        let chat = chat.clone();
        let event_tx = event_tx.clone();
        let backoff = backoff.clone();
        async move {
            if !chat.ready() {
                let mut backoff = backoff.lock().await;
                if !backoff.due(Instant::now()) {
                    return PollControl::Continue;
                }

                match chat.warm_up().await {
                    Ok(()) => {}
                    // bad or missing key
                    Err(ChatError::AuthenticationError) => {
                        tracing::error!("AI service rejected the API key, lookups stay disabled");
                        return PollControl::Stop;
                    }
                    Err(e) => tracing::debug!("AI warm-up failed: {e}"),
                }

                if !chat.ready() {
                    backoff.failed(Instant::now());
                    tracing::debug!("Next AI warm-up in {:?}", backoff.next_attempt - Instant::now());
                    return PollControl::Continue;
                }
            }

            tracing::info!("AI service ready");
            if let Err(e) = event_tx.send(AppEvent::AiReady).await {
                tracing::error!("Failed to send AiReady: {e}");
            }
            PollControl::Stop
        }
    });

    handle.join().await;

    // Stay in the task set until shutdown
    cancel.cancelled().await;
    Ok(())
}
