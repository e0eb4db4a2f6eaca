//! Interval polling with an owned, cancellable handle.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollControl {
    Continue,
    Stop,
}

/// A running poller. Dropping the handle stops it.
pub struct PollHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl PollHandle {
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Wait for the poller to end on its own (or after `stop`)
    pub async fn join(mut self) {
        if let Some(task) = self.task.take()
            && let Err(e) = task.await
        {
            tracing::error!("Poller task failed: {e}");
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Call `tick` every `period` (first call right away) until it returns
/// [`PollControl::Stop`] or `cancel` fires.
pub fn spawn_poller<F, Fut>(period: Duration, cancel: CancellationToken, mut tick: F) -> PollHandle
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = PollControl> + Send + 'static,
{
    let token = cancel.clone();
    let task = tokio::spawn(async move {
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    tracing::debug!("Poller cancelled");
                    break;
                }
                _ = interval.tick() => {
                    let control = tokio::select! {
                        biased;
                        _ = token.cancelled() => PollControl::Stop,
                        control = tick() => control,
                    };
                    if control == PollControl::Stop {
                        break;
                    }
                }
            }
        }
    });

    PollHandle {
        cancel,
        task: Some(task),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use tokio::time::timeout;

    use super::*;

    #[tokio::test]
    async fn stops_when_tick_says_so() {
        let count = Arc::new(AtomicU32::new(0));
        let counter = count.clone();

        let handle = spawn_poller(Duration::from_millis(5), CancellationToken::new(), move || {
            let counter = counter.clone();
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) + 1 >= 3 {
                    PollControl::Stop
                } else {
                    PollControl::Continue
                }
            }
        });

        timeout(Duration::from_secs(2), handle.join())
            .await
            .expect("poller should stop by itself");
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn cancelling_the_parent_token_stops_the_poller() {
        let parent = CancellationToken::new();
        let handle = spawn_poller(Duration::from_millis(5), parent.child_token(), || async {
            PollControl::Continue
        });

        parent.cancel();

        timeout(Duration::from_secs(2), handle.join())
            .await
            .expect("poller should stop after cancel");
    }

    #[tokio::test]
    async fn dropping_the_handle_stops_the_poller() {
        let cancel = CancellationToken::new();
        let observer = cancel.clone();
        let handle = spawn_poller(Duration::from_millis(5), cancel, || async {
            PollControl::Continue
        });

        drop(handle);

        assert!(observer.is_cancelled());
    }
}
