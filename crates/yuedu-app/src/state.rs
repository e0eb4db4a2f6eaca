use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;
use yuedu_config::Config;
use yuedu_io::SessionStore;

pub struct AppState {
    pub config: Arc<RwLock<Config>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
        }
    }
}

/// Configured session file, or `<data dir>/yuedu/session.json`
pub fn session_path(config: &Config) -> Option<PathBuf> {
    config
        .session
        .path
        .as_ref()
        .map(PathBuf::from)
        .or_else(|| dirs::data_local_dir().map(|dir| dir.join("yuedu").join("session.json")))
}

/// Open the session store, falling back to memory if the file is unusable
pub fn open_session(config: &Config) -> SessionStore {
    let Some(path) = session_path(config) else {
        tracing::warn!("No data directory, session kept in memory");
        return SessionStore::in_memory();
    };

    if let Some(parent) = path.parent()
        && let Err(e) = std::fs::create_dir_all(parent)
    {
        tracing::warn!("Failed to create {}: {e}", parent.display());
    }

    match SessionStore::open(&path) {
        Ok(store) => {
            tracing::info!("Session store at {}", path.display());
            store
        }
        Err(e) => {
            tracing::error!("Failed to open session store {}: {e}", path.display());
            SessionStore::in_memory()
        }
    }
}
