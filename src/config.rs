use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::types::{SaveMode, TimeFormat};

/// User settings, read from `config.toml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where log files and application logs are written
    pub data_dir: Option<PathBuf>,
    pub time_format: TimeFormat,
    pub save_mode: SaveMode,
    /// Write the log file after every logged interval and on reset
    pub autosave: bool,
    /// Tracing filter level, overridden by `RUST_LOG`
    pub log_level: String,
    /// Redraw interval for the running timer
    pub tick_rate_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            time_format: TimeFormat::default(),
            save_mode: SaveMode::default(),
            autosave: true,
            log_level: "info".to_string(),
            tick_rate_ms: 100,
        }
    }
}

impl Config {
    /// Load config from a specific path, falling back to defaults when absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    /// `<config dir>/timestudy/config.toml`, or `./timestudy.toml` without a config dir.
    pub fn default_path() -> PathBuf {
        match dirs::config_dir() {
            Some(dir) => dir.join("timestudy").join("config.toml"),
            None => PathBuf::from("timestudy.toml"),
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(crate::store::default_data_dir)
    }
}
