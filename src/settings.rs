//! Device-local user settings, stored as JSON next to the database.
//!
//! Settings are best-effort: a missing or malformed file is replaced with
//! defaults and logged, never a crash.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::app::{InletError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingMode {
    #[default]
    Compact,
    Full,
}

/// A named item-list filter the user saved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavedView {
    pub statuses: Vec<String>,
    pub category: Option<String>,
    pub min_score: Option<f64>,
}

/// A user-added feed not in the built-in registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomSource {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Global switch for the periodic refresh timer.
    pub refresh_enabled: bool,
    pub reading_mode: ReadingMode,
    pub custom_sources: Vec<CustomSource>,
    pub saved_views: BTreeMap<String, SavedView>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            refresh_enabled: true,
            reading_mode: ReadingMode::default(),
            custom_sources: Vec::new(),
            saved_views: BTreeMap::new(),
        }
    }
}

impl Settings {
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| InletError::Config("Could not find config directory".into()))?;
        Ok(config_dir.join("inlet").join("settings.json"))
    }

    /// Load settings, falling back to defaults on any problem.
    pub fn load(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => return Self::default(),
        };
        match serde_json::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(
                    "discarding malformed settings at {}: {}",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| InletError::Config(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load(&dir.path().join("nope.json"));
        assert_eq!(settings, Settings::default());
        assert!(settings.refresh_enabled);
    }

    #[test]
    fn test_malformed_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not valid json").unwrap();

        let settings = Settings::load(&path);
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"reading_mode": "full"}"#).unwrap();

        let settings = Settings::load(&path);
        assert_eq!(settings.reading_mode, ReadingMode::Full);
        assert!(settings.refresh_enabled);
    }

    #[test]
    fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut settings = Settings::default();
        settings.refresh_enabled = false;
        settings.custom_sources.push(CustomSource {
            name: "My Feed".into(),
            url: "https://my.example.com/feed".into(),
            category: Some("Tech".into()),
        });
        settings.saved_views.insert(
            "hot".into(),
            SavedView {
                statuses: vec!["unread".into()],
                min_score: Some(0.8),
                ..SavedView::default()
            },
        );
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path);
        assert_eq!(loaded, settings);
    }
}
