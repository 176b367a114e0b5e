//! Application configuration: storage locations for presets and chats.

use std::env;
use std::path::PathBuf;

use crate::core::paths;

#[derive(Debug, Clone)]
pub struct Config {
    pub presets_dir: PathBuf,
    pub chats_dir: PathBuf,
}

#[derive(Debug)]
pub enum ConfigError {
    NoDataDir,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NoDataDir => {
                write!(f, "no data directory available on this platform")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration from the environment, falling back to the platform
/// data directory. `KOLOSAL_PRESETS_DIR` and `KOLOSAL_CHATS_DIR` override
/// the preset and chat storage locations respectively.
pub fn load() -> Result<Config, ConfigError> {
    let presets_dir = match env::var_os("KOLOSAL_PRESETS_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => paths::data_dir()
            .ok_or(ConfigError::NoDataDir)?
            .join("presets"),
    };

    let chats_dir = match env::var_os("KOLOSAL_CHATS_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => paths::data_dir().ok_or(ConfigError::NoDataDir)?.join("chats"),
    };

    Ok(Config {
        presets_dir,
        chats_dir,
    })
}
