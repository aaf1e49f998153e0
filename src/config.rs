use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const CONFIG_VERSION: u64 = 1;

/// Environment variable overriding the API base URL (also read from `.env`).
pub const API_URL_ENV: &str = "GESTAO_API_URL";

const DEFAULT_API_URL: &str = "http://127.0.0.1:5000/api";

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join("gestao")
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("gestao")
}

/// Where the bearer token is kept between runs.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStorage {
    /// Alongside the user profile in `session.json`.
    #[default]
    File,
    /// In the Secret Service keyring; only the profile goes to disk.
    Keyring,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub version: u64,
    pub api_base_url: String,
    pub data_directory: PathBuf,
    pub token_storage: TokenStorage,
    pub debug_logging: bool,
    /// Program that opens attachment links.
    pub browser_command: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            api_base_url: DEFAULT_API_URL.to_string(),
            data_directory: default_data_dir(),
            token_storage: TokenStorage::default(),
            debug_logging: false,
            browser_command: "xdg-open".to_string(),
        }
    }
}

impl ConsoleConfig {
    pub fn config_path() -> PathBuf {
        default_config_dir().join("config.json")
    }

    pub fn session_path(&self) -> PathBuf {
        self.data_directory.join("session.json")
    }

    /// Load the config file (defaults when missing or unreadable), then apply
    /// `.env` and environment overrides.
    pub fn load() -> Self {
        let mut config = match std::fs::read_to_string(Self::config_path()) {
            Ok(content) => match serde_json::from_str::<ConsoleConfig>(&content) {
                Ok(cfg) => cfg,
                Err(e) => {
                    log::warn!("Ignoring malformed config file: {}", e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        };

        if let Err(e) = dotenvy::dotenv() {
            log::debug!("No .env loaded: {}", e);
        }
        config.apply_env(std::env::var(API_URL_ENV).ok());
        config
    }

    fn apply_env(&mut self, api_url: Option<String>) {
        if let Some(url) = api_url {
            let url = url.trim();
            if !url.is_empty() {
                self.api_base_url = url.to_string();
            }
        }
        self.api_base_url = self.api_base_url.trim_end_matches('/').to_string();
    }

    pub fn save(&self) -> std::io::Result<()> {
        let path = Self::config_path();
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    /// Ensure the data directory exists.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.data_directory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_override_wins_and_trailing_slash_is_dropped() {
        let mut cfg = ConsoleConfig::default();
        cfg.apply_env(Some("https://api.example.com/api/".to_string()));
        assert_eq!(cfg.api_base_url, "https://api.example.com/api");
    }

    #[test]
    fn blank_env_keeps_configured_url() {
        let mut cfg = ConsoleConfig::default();
        cfg.apply_env(Some("   ".to_string()));
        assert_eq!(cfg.api_base_url, DEFAULT_API_URL);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let cfg: ConsoleConfig =
            serde_json::from_str(r#"{"token_storage":"keyring"}"#).unwrap();
        assert_eq!(cfg.token_storage, TokenStorage::Keyring);
        assert_eq!(cfg.api_base_url, DEFAULT_API_URL);
        assert!(!cfg.debug_logging);
        assert_eq!(cfg.browser_command, "xdg-open");
    }
}
