use serde::{Deserialize, Serialize};

fn default_base_url() -> String {
    "http://127.0.0.1:5328".to_string()
}

fn default_process_path() -> String {
    "/api/process-url".to_string()
}

fn default_status_path() -> String {
    "/api/annotation-status/${task_id}".to_string()
}

fn default_allowed_prefix() -> String {
    "https://baike.baidu.com/item/".to_string()
}

fn default_status_interval_ms() -> u64 {
    4000
}

fn default_timeout_seconds() -> u64 {
    30
}

/// Article extraction backend
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_process_path")]
    pub process_path: String,
    /// `${task_id}` is replaced with the annotation task identifier
    #[serde(default = "default_status_path")]
    pub status_path: String,
    /// Submitted URLs must start with this
    #[serde(default = "default_allowed_prefix")]
    pub allowed_prefix: String,
    #[serde(default = "default_status_interval_ms")]
    pub status_interval_ms: u64,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            process_path: default_process_path(),
            status_path: default_status_path(),
            allowed_prefix: default_allowed_prefix(),
            status_interval_ms: default_status_interval_ms(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl BackendConfig {
    pub fn new() -> Self {
        let mut config = Self::default();
        config.apply_env(&crate::process_env);
        config
    }

    /// Override fields whose variables are set
    pub fn apply_env(&mut self, var: &dyn Fn(&str) -> Option<String>) {
        if let Some(url) = var("BACKEND_URL") {
            self.base_url = url;
        }
        if let Some(prefix) = var("ALLOWED_URL_PREFIX") {
            self.allowed_prefix = prefix;
        }
        if let Some(ms) = var("STATUS_INTERVAL_MS").and_then(|v| v.parse().ok()) {
            self.status_interval_ms = ms;
        }
        if let Some(secs) = var("TIMEOUT_SECONDS").and_then(|v| v.parse().ok()) {
            self.timeout_seconds = secs;
        }
    }

    pub fn process_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.process_path)
    }

    pub fn status_url(&self, task_id: &str) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.status_path.replace("${task_id}", task_id)
        )
    }
}
