use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use yuedu_io::SessionKey;
use yuedu_types::{AnnotationStatus, AppEvent, Submission};

use super::support::{Harness, ScriptedChat};
use crate::events::session::ARTICLE_NOT_FOUND;

#[tokio::test]
async fn invalid_url_is_reported_without_a_request() {
    let mut harness = Harness::new(Arc::new(ScriptedChat::new()));

    harness
        .send(AppEvent::SubmitUrl("https://example.com/item/x".into()))
        .await;

    match harness.next_ui().await {
        AppEvent::InputError(message) => {
            assert!(message.starts_with("Please enter a valid Baidu Baike article link"))
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert!(harness.loop_rx.is_empty());
}

#[tokio::test]
async fn extracted_article_is_annotated_and_shown() {
    let chat = Arc::new(ScriptedChat::new().reply("长城", "Great Wall"));
    let mut harness = Harness::new(chat);

    harness
        .send(AppEvent::SubmitFinished {
            submission: 0,
            outcome: Ok(Submission::Extracted {
                title: Some("长城".into()),
                text: "长城\n佚名\n长城很长。".into(),
            }),
        })
        .await;
    harness.pump().await;

    match harness.next_ui().await {
        AppEvent::ShowArticle(content) => assert!(content.contains("长城")),
        other => panic!("unexpected event {other:?}"),
    }
    let session = &harness.ctx.session;
    assert_eq!(session.get(SessionKey::ArticleTitle), Some("长城"));
    assert_eq!(
        session.get(SessionKey::EntireArticle),
        Some("长城\n佚名\n长城很长。")
    );
    assert!(session.get(SessionKey::ArticleContent).is_some());
}

#[tokio::test]
async fn extracted_article_needs_ready_ai() {
    let mut harness = Harness::new(Arc::new(ScriptedChat::new().not_ready()));

    harness
        .send(AppEvent::SubmitFinished {
            submission: 0,
            outcome: Ok(Submission::Extracted {
                title: None,
                text: "正文".into(),
            }),
        })
        .await;

    match harness.next_ui().await {
        AppEvent::InputError(message) => {
            assert_eq!(message, "AI service initializing or not available.")
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(harness.ctx.session.get(SessionKey::EntireArticle), Some("正文"));
}

#[tokio::test]
async fn completed_task_wins_over_local_annotation() {
    let mut harness = Harness::new(Arc::new(ScriptedChat::new()));
    harness.ctx.remember(SessionKey::ArticleContent, "本地");
    harness.ctx.remember(SessionKey::AnnotationTaskId, "t-1");

    harness
        .send(AppEvent::AnnotationProgress {
            submission: 0,
            status: AnnotationStatus::Completed {
                annotated_text: "题\n者\n<服务器>".into(),
            },
        })
        .await;

    match harness.next_ui().await {
        AppEvent::ShowArticle(content) => assert_eq!(content, "题\n者\n<服务器>"),
        other => panic!("unexpected event {other:?}"),
    }
    assert!(harness.ctx.session.get(SessionKey::AnnotationTaskId).is_none());
    assert!(harness.ctx.status_poller.is_none());
}

#[tokio::test]
async fn failed_task_is_reported() {
    let mut harness = Harness::new(Arc::new(ScriptedChat::new()));

    harness
        .send(AppEvent::AnnotationProgress {
            submission: 0,
            status: AnnotationStatus::Failed {
                error: "timeout".into(),
            },
        })
        .await;

    match harness.next_ui().await {
        AppEvent::InputError(message) => assert_eq!(message, "Annotation failed: timeout"),
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn annotation_finishing_after_a_new_submit_is_dropped() {
    let chat = Arc::new(ScriptedChat::new().reply("旧文章", "old").gated("旧文章"));
    let mut harness = Harness::new(chat.clone());

    harness
        .send(AppEvent::SubmitFinished {
            submission: 0,
            outcome: Ok(Submission::Extracted {
                title: None,
                text: "旧文章".into(),
            }),
        })
        .await;
    harness
        .send(AppEvent::SubmitUrl("https://baike.baidu.com/item/新文章".into()))
        .await;
    assert_eq!(harness.ctx.submission, 1);
    chat.open("旧文章");

    // The new submission's backend request may report back first
    loop {
        let event = timeout(Duration::from_secs(2), harness.loop_rx.recv())
            .await
            .expect("timed out waiting for annotation")
            .expect("loopback closed");
        let annotated = matches!(event, AppEvent::ArticleAnnotated { submission: 0, .. });
        harness.send(event).await;
        if annotated {
            break;
        }
    }

    assert!(
        !harness
            .pending_ui()
            .iter()
            .any(|event| matches!(event, AppEvent::ShowArticle(_)))
    );
    assert!(harness.ctx.session.get(SessionKey::ArticleContent).is_none());
    assert!(harness.ctx.session.get(SessionKey::EntireArticle).is_none());
}

#[tokio::test]
async fn status_from_an_older_submission_is_dropped() {
    let mut harness = Harness::new(Arc::new(ScriptedChat::new()));
    harness.ctx.next_submission();
    harness.ctx.next_submission();

    harness
        .send(AppEvent::AnnotationProgress {
            submission: 1,
            status: AnnotationStatus::Completed {
                annotated_text: "题\n者\n<旧>".into(),
            },
        })
        .await;
    harness
        .send(AppEvent::SubmitFinished {
            submission: 1,
            outcome: Err("late failure".into()),
        })
        .await;

    assert!(harness.pending_ui().is_empty());
    assert!(harness.ctx.session.get(SessionKey::AnnotatedWorkText).is_none());
}

#[tokio::test]
async fn resume_without_session_shows_placeholder() {
    let mut harness = Harness::new(Arc::new(ScriptedChat::new()));

    harness.send(AppEvent::ResumeSession).await;

    match harness.next_ui().await {
        AppEvent::ShowArticle(content) => assert_eq!(content, ARTICLE_NOT_FOUND),
        other => panic!("unexpected event {other:?}"),
    }
}
