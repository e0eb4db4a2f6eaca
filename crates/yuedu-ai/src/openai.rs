use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use crate::{ChatError, ChatRequest, ChatResponse, ChatService, ProviderMetadata};

const WARM_UP_PROMPT: &str = "Knock knock!";

/// OpenAI-compatible chat completions endpoint
pub struct OpenAiChat {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
    warmed_up: AtomicBool,
}

impl OpenAiChat {
    pub fn new(api_url: String, api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
            model,
            warmed_up: AtomicBool::new(false),
        }
    }

    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, ChatError> {
        if self.api_key.is_empty() {
            return Err(ChatError::AuthenticationError);
        }

        let model = request.model.as_deref().unwrap_or(&self.model);
        let body = serde_json::json!({
            "model": model,
            "messages": request.to_messages(),
        });

        tracing::debug!(model = %model, "sending chat request");

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == 429 {
            return Err(ChatError::RateLimitExceeded);
        }

        if status == 401 || status == 403 {
            return Err(ChatError::AuthenticationError);
        }

        if !status.is_success() {
            let err_body = response.text().await.unwrap_or_default();
            return Err(ChatError::ApiError(format!("{status}: {err_body}")));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ChatError::ApiError(format!("Failed to parse response: {e}")))?;

        let content = json["choices"]
            .get(0)
            .and_then(|c| c["message"]["content"].as_str())
            .ok_or_else(|| ChatError::ApiError("No message in response".to_string()))?;

        Ok(ChatResponse::from_content(content))
    }
}

#[async_trait]
impl ChatService for OpenAiChat {
    fn ready(&self) -> bool {
        !self.api_key.is_empty() && self.warmed_up.load(Ordering::Acquire)
    }

    async fn warm_up(&self) -> Result<(), ChatError> {
        let response = self.send(&ChatRequest::prompt(WARM_UP_PROMPT)).await?;
        tracing::debug!("Warm-up reply: {}", response.content());
        self.warmed_up.store(true, Ordering::Release);
        Ok(())
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ChatError> {
        if self.api_key.is_empty() {
            return Err(ChatError::NotReady);
        }
        self.send(&request).await
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "OpenAI-compatible".to_string(),
            requires_api_key: true,
        }
    }
}
