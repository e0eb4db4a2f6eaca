use std::time::Duration;

use serde::Deserialize;
use yuedu_config::backend::BackendConfig;
use yuedu_types::{AnnotationStatus, Submission};

const MAX_RAW_ERROR_CHARS: usize = 150;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Rejected before any request was made
    #[error("{0}")]
    InvalidUrl(String),

    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error("Could not reach backend: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected backend reply: {0}")]
    Decode(String),
}

/// Check a user-entered article URL. Returns the trimmed URL.
pub fn validate_article_url(input: &str, allowed_prefix: &str) -> Result<String, BackendError> {
    let url = input.trim();

    if url.is_empty() {
        return Err(BackendError::InvalidUrl("Please enter a URL.".to_string()));
    }

    if url::Url::parse(url).is_err() {
        return Err(BackendError::InvalidUrl(
            "Please enter a valid URL.".to_string(),
        ));
    }

    if !url.starts_with(allowed_prefix) {
        return Err(BackendError::InvalidUrl(format!(
            "Please enter a valid Baidu Baike article link (starting with \"{allowed_prefix}\")."
        )));
    }

    Ok(url.to_string())
}

/// User-facing message for a failed backend reply.
///
/// JSON bodies contribute their `error` field, anything else its first
/// characters; an empty body falls back to the status code.
pub fn error_message(status: u16, body: &str) -> String {
    let generic = format!("HTTP error! status: {status}");

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(json) => json
            .get("error")
            .and_then(|e| e.as_str())
            .filter(|e| !e.is_empty())
            .map(str::to_string)
            .unwrap_or(generic),
        Err(_) => {
            let truncated: String = body.chars().take(MAX_RAW_ERROR_CHARS).collect();
            if truncated.is_empty() {
                generic
            } else {
                truncated
            }
        }
    }
}

/// Decode a process-url reply into a [`Submission`]
pub fn decode_processed(body: &str) -> Submission {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) {
        let task_id = map.get("task_id").and_then(|id| match id {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        });
        if let Some(task_id) = task_id {
            return Submission::Task { task_id };
        }

        let text = ["text", "content", "article"]
            .iter()
            .find_map(|key| map.get(*key).and_then(|v| v.as_str()));
        if let Some(text) = text {
            return Submission::Extracted {
                title: map
                    .get("title")
                    .and_then(|t| t.as_str())
                    .map(str::to_string),
                text: text.to_string(),
            };
        }
    }

    Submission::Extracted {
        title: None,
        text: body.to_string(),
    }
}

#[derive(Deserialize)]
struct StatusReply {
    status: String,
    #[serde(default)]
    annotated_text: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

pub fn decode_status(body: &str) -> Result<AnnotationStatus, BackendError> {
    let reply: StatusReply =
        serde_json::from_str(body).map_err(|e| BackendError::Decode(e.to_string()))?;

    match reply.status.to_ascii_lowercase().as_str() {
        "pending" => Ok(AnnotationStatus::Pending),
        "completed" => reply
            .annotated_text
            .map(|annotated_text| AnnotationStatus::Completed { annotated_text })
            .ok_or_else(|| BackendError::Decode("completed without annotated_text".to_string())),
        "failed" => Ok(AnnotationStatus::Failed {
            error: reply
                .error
                .unwrap_or_else(|| "Annotation failed".to_string()),
        }),
        other => Err(BackendError::Decode(format!("unknown status '{other}'"))),
    }
}

#[derive(Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    config: BackendConfig,
}

impl BackendClient {
    pub fn new(config: BackendConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Ask the backend to fetch and extract an article
    pub async fn process_url(&self, url: &str) -> Result<Submission, BackendError> {
        let endpoint = self.config.process_url();
        tracing::info!("Submitting {} to {}", url, endpoint);

        let response = self
            .client
            .post(&endpoint)
            .json(&serde_json::json!({ "url": url }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = error_message(status.as_u16(), &body);
            tracing::warn!("Backend rejected {}: {}", url, message);
            return Err(BackendError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        Ok(decode_processed(&body))
    }

    pub async fn annotation_status(&self, task_id: &str) -> Result<AnnotationStatus, BackendError> {
        let response = self
            .client
            .get(self.config.status_url(task_id))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(BackendError::Upstream {
                status: status.as_u16(),
                message: error_message(status.as_u16(), &body),
            });
        }

        decode_status(&body)
    }
}
