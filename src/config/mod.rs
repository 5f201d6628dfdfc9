//! Configuration, read from `~/.config/inlet/config.toml` at startup.
//! A commented default file is written on first run. Missing fields use
//! defaults; a file that fails to parse is an error (unlike device
//! settings, which degrade silently).

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use serde::Deserialize;

use crate::app::{InletError, Result};

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Overrides the platform data-dir database location.
    pub db_path: Option<PathBuf>,
    pub sync: SyncConfig,
    pub summarizer: SummarizerConfig,
    pub refresh: RefreshConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SyncConfig {
    /// Remote aggregation endpoint; sync is disabled when unset.
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    pub endpoint: String,
    pub model: String,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434".into(),
            model: "llama3.2".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Fixed refresh interval for the daemon, e.g. "1h", "30m".
    pub interval: String,
    pub workers: usize,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: "1h".into(),
            workers: crate::refresh::DEFAULT_WORKERS,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::default_config_path()?;

        if !path.exists() {
            Self::create_default_config(&path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| InletError::Config(format!("{}: {}", path.display(), e)))?;
        Ok(config)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| InletError::Config("Could not find config directory".into()))?;
        Ok(config_dir.join("inlet").join("config.toml"))
    }

    fn create_default_config(path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::File::create(path)?;
        file.write_all(Self::default_config_content().as_bytes())?;
        Ok(())
    }

    fn default_config_content() -> &'static str {
        r##"# inlet configuration

# Override the database location (defaults to the platform data dir).
# db_path = "/path/to/inlet.db"

[sync]
# Remote aggregation endpoint. Sync stays disabled while unset.
# endpoint = "https://example.com/api/items"

[summarizer]
# Local generative model server (Ollama-style /api/generate).
endpoint = "http://localhost:11434"
model = "llama3.2"

[refresh]
# Fixed interval for the background daemon: "30m", "1h", "6h", "1d".
interval = "1h"
# Parallel source fetches per cycle.
workers = 10
"##
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_content_parses() {
        let config: Config = toml::from_str(Config::default_config_content()).unwrap();
        assert_eq!(config.summarizer.model, "llama3.2");
        assert_eq!(config.refresh.interval, "1h");
        assert!(config.sync.endpoint.is_none());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: Config = toml::from_str("[sync]\nendpoint = \"https://api.example.com\"\n")
            .unwrap();
        assert_eq!(config.sync.endpoint.as_deref(), Some("https://api.example.com"));
        assert_eq!(config.refresh.workers, crate::refresh::DEFAULT_WORKERS);
        assert_eq!(config.summarizer.endpoint, "http://localhost:11434");
    }

    #[test]
    fn test_empty_config_is_all_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.db_path.is_none());
        assert_eq!(config.refresh.interval, "1h");
    }
}
