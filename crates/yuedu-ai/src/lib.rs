use serde::{Deserialize, Serialize};

mod openai;

pub use openai::OpenAiChat;

/// Hosted AI chat capability
#[async_trait::async_trait]
pub trait ChatService: Send + Sync {
    /// Whether the service can take requests right now
    fn ready(&self) -> bool;

    /// Try to become ready. The readiness watcher retries with a growing
    /// delay until `ready()` turns true.
    async fn warm_up(&self) -> Result<(), ChatError> {
        Ok(())
    }

    /// Send one request and wait for the reply
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ChatError>;

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatInput {
    Prompt(String),
    Messages(Vec<ChatMessage>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub input: ChatInput,
    /// Provider default when unset
    pub model: Option<String>,
}

impl ChatRequest {
    pub fn prompt(prompt: impl Into<String>) -> Self {
        Self {
            input: ChatInput::Prompt(prompt.into()),
            model: None,
        }
    }

    pub fn messages(messages: Vec<ChatMessage>) -> Self {
        Self {
            input: ChatInput::Messages(messages),
            model: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// The request as a message list (a bare prompt is one user message)
    pub fn to_messages(&self) -> Vec<ChatMessage> {
        match &self.input {
            ChatInput::Prompt(prompt) => vec![ChatMessage::user(prompt.clone())],
            ChatInput::Messages(messages) => messages.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMessage {
    pub content: String,
}

/// A reply carries its text either as `message.content` or as `text`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub message: Option<ResponseMessage>,
    #[serde(default)]
    pub text: Option<String>,
}

impl ChatResponse {
    pub fn from_content(content: impl Into<String>) -> Self {
        Self {
            message: Some(ResponseMessage {
                content: content.into(),
            }),
            text: None,
        }
    }

    pub fn content(&self) -> &str {
        self.message
            .as_ref()
            .map(|m| m.content.as_str())
            .filter(|c| !c.is_empty())
            .or(self.text.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: String,
    pub requires_api_key: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("AI service not ready")]
    NotReady,

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Authentication error")]
    AuthenticationError,
}
