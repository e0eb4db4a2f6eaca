use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use yuedu_types::AppEvent;

use super::support::ScriptedChat;
use crate::io::readiness_watcher;

#[tokio::test]
async fn ready_service_is_announced_once_and_watcher_waits_for_shutdown() {
    let (tx, rx) = kanal::unbounded_async();
    let cancel = CancellationToken::new();
    let watcher = tokio::spawn(readiness_watcher(
        Arc::new(ScriptedChat::new()),
        Duration::from_millis(10),
        cancel.clone(),
        tx,
    ));

    let event = timeout(Duration::from_secs(2), rx.recv()).await.unwrap().unwrap();
    assert!(matches!(event, AppEvent::AiReady));

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(rx.is_empty());
    assert!(!watcher.is_finished());

    cancel.cancel();
    timeout(Duration::from_secs(2), watcher)
        .await
        .expect("watcher should stop on cancel")
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn unready_service_is_never_announced() {
    let (tx, rx) = kanal::unbounded_async();
    let cancel = CancellationToken::new();
    let watcher = tokio::spawn(readiness_watcher(
        Arc::new(ScriptedChat::new().not_ready()),
        Duration::from_millis(10),
        cancel.clone(),
        tx,
    ));

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(rx.is_empty());

    cancel.cancel();
    timeout(Duration::from_secs(2), watcher).await.unwrap().unwrap().unwrap();
}

#[tokio::test]
async fn rate_limited_warm_up_is_not_retried_every_tick() {
    let (tx, rx) = kanal::unbounded_async();
    let cancel = CancellationToken::new();
    let chat = Arc::new(ScriptedChat::new().rate_limited());
    let watcher = tokio::spawn(readiness_watcher(
        chat.clone(),
        Duration::from_millis(10),
        cancel.clone(),
        tx,
    ));

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(chat.warm_ups(), 1);
    assert!(rx.is_empty());
    assert!(!watcher.is_finished());

    cancel.cancel();
    timeout(Duration::from_secs(2), watcher).await.unwrap().unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn warm_up_retries_back_off() {
    let (tx, _rx) = kanal::unbounded_async();
    let cancel = CancellationToken::new();
    let chat = Arc::new(ScriptedChat::new().rate_limited());
    let watcher = tokio::spawn(readiness_watcher(
        chat.clone(),
        Duration::from_millis(10),
        cancel.clone(),
        tx,
    ));

    // Attempts at 0s, 1s, 3s, 7s
    tokio::time::sleep(Duration::from_millis(7500)).await;
    assert_eq!(chat.warm_ups(), 4);

    cancel.cancel();
    watcher.await.unwrap().unwrap();
}
