use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct SessionConfig {
    /// File backing the session store; the app falls back to a per-user
    /// data file when unset
    pub path: Option<String>,
}

impl SessionConfig {
    pub fn new() -> Self {
        let mut config = Self::default();
        config.apply_env(&crate::process_env);
        config
    }

    pub fn apply_env(&mut self, var: &dyn Fn(&str) -> Option<String>) {
        if let Some(path) = var("YUEDU_SESSION_PATH") {
            self.path = Some(path);
        }
    }
}
