// client/src/config.rs
// Client configuration: backend endpoint, credentials, UI timings.
// Loaded once in `main` and passed into the app by value; there is no
// global config state.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
    /// Base URL of the hosted backend service.
    pub backend_url: String,
    /// API key appended to account requests.
    pub api_key: String,
    /// Where tracing output goes; the terminal itself is owned by the UI.
    pub log_file: Option<PathBuf>,
    pub notification_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            backend_url: "https://api.sitew.example.com".to_string(),
            api_key: String::new(),
            log_file: None,
            notification_timeout_ms: 3000,
        }
    }
}

impl Config {
    /// `$SITEW_HOME/config.json`, defaulting to `~/.config/sitew`.
    pub fn config_dir() -> PathBuf {
        if let Ok(home) = std::env::var("SITEW_HOME") {
            return PathBuf::from(home);
        }
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".config").join("sitew")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.json")
    }

    /// Config file first, then environment overrides. Absent or unreadable
    /// files fall back to defaults.
    pub fn load() -> Self {
        let mut config: Config = fs::read_to_string(Self::config_path())
            .ok()
            .and_then(|data| serde_json::from_str(&data).ok())
            .unwrap_or_default();
        if let Ok(url) = std::env::var("SITEW_BACKEND_URL") {
            config.backend_url = url;
        }
        if let Ok(key) = std::env::var("SITEW_API_KEY") {
            config.api_key = key;
        }
        config
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| Self::config_dir().join("sitew-tui.log"))
    }
}
