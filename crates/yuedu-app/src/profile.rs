use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use yuedu_config::Config;

fn yuedu_root() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("yuedu"))
}

fn profiles_dir() -> Option<PathBuf> {
    yuedu_root().map(|root| root.join("profiles"))
}

/// Represents a user profile
#[derive(Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub value: Config,
}

fn read_profile(path: &Path) -> anyhow::Result<Config> {
    let data = fs::read_to_string(path)?;
    let profile: Profile = serde_json::from_str(&data)?;
    Ok(profile.value)
}

/// Load a plain config JSON file (no profile wrapper)
pub fn load_config_file(path: &Path) -> anyhow::Result<Config> {
    tracing::info!("Loading config from {}", path.display());
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

/// Plain defaults. Environment values are layered on at load time, so
/// nothing from the environment (the API key in particular) lands on disk.
pub fn default_profile() -> Profile {
    Profile {
        name: "main".into(),
        value: Config::default(),
    }
}

/// Initialize user config folders and main profile if missing
pub fn init_user_config() -> anyhow::Result<()> {
    let Some(dir) = profiles_dir() else {
        tracing::warn!("No config directory, profiles disabled");
        return Ok(());
    };
    fs::create_dir_all(&dir)?;

    let main_profile = dir.join("main.json");
    if !main_profile.exists() {
        fs::write(&main_profile, serde_json::to_string_pretty(&default_profile())?)?;
        tracing::info!("Created main profile at {}", main_profile.display());
    }

    Ok(())
}

/// Load a user profile by name, defaulting to main, then to plain defaults.
/// Callers apply environment overrides afterwards.
pub fn load_user_profile(name: &str) -> anyhow::Result<Config> {
    let Some(dir) = profiles_dir() else {
        return Ok(Config::default());
    };

    let profile_file = dir.join(format!("{name}.json"));
    if profile_file.exists() {
        return read_profile(&profile_file);
    }

    tracing::warn!("Profile {name} not found, falling back to main profile or defaults");
    let main_file = dir.join("main.json");
    if main_file.exists() {
        read_profile(&main_file)
    } else {
        Ok(Config::default())
    }
}
