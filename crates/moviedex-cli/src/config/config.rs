//! `AppConfig` struct and TOML read/write.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Search behavior settings.
    #[serde(default)]
    pub search: SearchConfig,
    /// Trending panel settings.
    #[serde(default)]
    pub trending: TrendingConfig,
}

/// Search behavior configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchConfig {
    /// Quiescence window before a typed query is committed (milliseconds).
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Response language passed to the catalog API.
    #[serde(default = "default_language")]
    pub language: String,
}

/// Trending panel configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrendingConfig {
    /// Number of trending entries to display.
    #[serde(default = "default_trending_limit")]
    pub limit: usize,
}

const fn default_debounce_ms() -> u64 {
    500
}

fn default_language() -> String {
    String::from("en-US")
}

const fn default_trending_limit() -> usize {
    5
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            language: default_language(),
        }
    }
}

impl Default for TrendingConfig {
    fn default() -> Self {
        Self {
            limit: default_trending_limit(),
        }
    }
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Loads config, writing a default file on first run so users have
    /// something to edit.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed, or
    /// if the default file cannot be written.
    pub fn load_or_init(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load(path);
        }
        let config = Self::default();
        config.save(path)?;
        tracing::info!(path = %path.display(), "wrote default config");
        Ok(config)
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }
}
