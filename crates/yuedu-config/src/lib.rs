use serde::{Deserialize, Serialize};

pub use self::ai::AiConfig;
pub use self::backend::BackendConfig;
pub use self::session::SessionConfig;
pub use self::ui::UiConfig;

pub mod ai;
pub mod backend;
pub mod session;
pub mod ui;

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub ai: AiConfig,
    pub ui: UiConfig,
    pub session: SessionConfig,
}

impl Config {
    /// Defaults with environment overrides applied
    pub fn new() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Layer environment variables over values loaded from a profile or
    /// file. Variables that are unset leave the loaded value alone.
    pub fn apply_env(&mut self) {
        self.apply_env_from(&process_env);
    }

    pub fn apply_env_from(&mut self, var: &dyn Fn(&str) -> Option<String>) {
        self.backend.apply_env(var);
        self.ai.apply_env(var);
        self.session.apply_env(var);
    }
}

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}
