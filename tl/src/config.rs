//! tasklist configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main tasklist configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Storage configuration
    pub storage: StorageConfig,

    /// Terminal UI configuration
    pub ui: UiConfig,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let (config, skipped) = Self::load_collecting(config_path)?;
        for message in &skipped {
            tracing::warn!("{}", message);
        }
        Ok(config)
    }

    /// Load configuration, returning skipped-file warnings instead of logging them
    ///
    /// Used before logging is set up, so the caller can emit the warnings once a
    /// subscriber exists.
    pub fn load_collecting(config_path: Option<&PathBuf>) -> Result<(Self, Vec<String>)> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            let config = Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()))?;
            return Ok((config, Vec::new()));
        }

        let mut skipped = Vec::new();
        let mut candidates = vec![PathBuf::from(".tasklist.yml")];
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join("tasklist").join("tasklist.yml"));
        }

        // Project-local .tasklist.yml, then ~/.config/tasklist/tasklist.yml
        for candidate in candidates.iter().filter(|p| p.exists()) {
            match Self::load_from_file(candidate) {
                Ok(config) => return Ok((config, skipped)),
                Err(e) => skipped.push(format!("Failed to load config from {}: {:#}", candidate.display(), e)),
            }
        }

        // No usable config file found, use defaults
        Ok((Self::default(), skipped))
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the key files
    #[serde(rename = "data-dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tasklist")
}

/// Terminal UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Length of the exit transition before a removal commits
    #[serde(rename = "exit-animation-ms")]
    pub exit_animation_ms: u64,

    /// Event poll / redraw interval
    #[serde(rename = "tick-rate-ms")]
    pub tick_rate_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            exit_animation_ms: 250,
            tick_rate_ms: 33,
        }
    }
}

impl UiConfig {
    pub fn exit_delay(&self) -> Duration {
        Duration::from_millis(self.exit_animation_ms)
    }

    pub fn tick_rate(&self) -> Duration {
        // A zero tick rate would spin the poll loop
        Duration::from_millis(self.tick_rate_ms.max(1))
    }
}
