use serde::{Deserialize, Serialize};

fn default_api_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_article_model() -> String {
    "gpt-4o".to_string()
}

fn default_readiness_interval_ms() -> u64 {
    200
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct AiConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Never written back to profile files
    #[serde(default, skip_serializing)]
    pub api_key: String,
    /// Model used for term lookups
    #[serde(default = "default_model")]
    pub model: String,
    /// Model used to annotate whole articles
    #[serde(default = "default_article_model")]
    pub article_model: String,
    /// Overrides the embedded lookup prompt
    #[serde(default)]
    pub lookup_prompt_path: Option<String>,
    /// Overrides the embedded article prompt
    #[serde(default)]
    pub article_prompt_path: Option<String>,
    #[serde(default = "default_readiness_interval_ms")]
    pub readiness_interval_ms: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: String::new(),
            model: default_model(),
            article_model: default_article_model(),
            lookup_prompt_path: None,
            article_prompt_path: None,
            readiness_interval_ms: default_readiness_interval_ms(),
        }
    }
}

impl AiConfig {
    pub fn new() -> Self {
        let mut config = Self::default();
        config.apply_env(&crate::process_env);
        config
    }

    /// Override fields whose variables are set
    pub fn apply_env(&mut self, var: &dyn Fn(&str) -> Option<String>) {
        if let Some(url) = var("AI_API_URL") {
            self.api_url = url;
        }
        if let Some(key) = var("AI_API_KEY") {
            self.api_key = key;
        }
        if let Some(model) = var("AI_MODEL") {
            self.model = model;
        }
        if let Some(model) = var("AI_ARTICLE_MODEL") {
            self.article_model = model;
        }
        if let Some(path) = var("LOOKUP_PROMPT_PATH") {
            self.lookup_prompt_path = Some(path);
        }
        if let Some(path) = var("ARTICLE_PROMPT_PATH") {
            self.article_prompt_path = Some(path);
        }
        if let Some(ms) = var("AI_READINESS_INTERVAL_MS").and_then(|v| v.parse().ok()) {
            self.readiness_interval_ms = ms;
        }
    }
}
