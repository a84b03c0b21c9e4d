//! Configuration file parser for ~/.config/riffle/config.toml.
//!
//! The config file is optional. A missing or empty file yields
//! `Config::default()`, which has no sources; the command line can supply them.
//! Unknown keys are accepted but logged as likely typos.
use crate::util::{validate_source_url, UrlValidationError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),

    /// Well-formed TOML with values riffle cannot run with.
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Invalid source '{url}': {source}")]
    BadSource {
        url: String,
        #[source]
        source: UrlValidationError,
    },
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// River URLs. With more than one, a source menu is shown.
    pub sources: Vec<String>,

    /// Seconds between scheduled polls.
    pub poll_seconds: u64,

    /// Label for the river panel.
    pub mount: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            poll_seconds: Self::DEFAULT_POLL_SECONDS,
            mount: Self::DEFAULT_MOUNT.to_string(),
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    pub const DEFAULT_POLL_SECONDS: u64 = 60;
    pub const DEFAULT_MOUNT: &'static str = "river";

    const KNOWN_KEYS: [&'static str; 3] = ["sources", "poll_seconds", "mount"];

    /// Default location, `~/.config/riffle/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        let home = std::env::var_os("HOME")?;
        Some(
            PathBuf::from(home)
                .join(".config")
                .join("riffle")
                .join("config.toml"),
        )
    }

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    ///
    /// The result is not validated; call [`Config::validate`] once command
    /// line overrides have been applied.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        // Size check before reading so a huge file is never pulled into memory
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            sources = config.sources.len(),
            poll_seconds = config.poll_seconds,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Check that the configuration can drive a river.
    ///
    /// Requires at least one source, every source an http(s) URL with a
    /// host, and a poll period of at least one second. Surrounding
    /// whitespace in sources is trimmed.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        if self.sources.is_empty() {
            return Err(ConfigError::Invalid(
                "no sources configured (set `sources` or pass --source)".to_string(),
            ));
        }
        for source in &mut self.sources {
            let trimmed = source.trim().to_string();
            validate_source_url(&trimmed).map_err(|e| ConfigError::BadSource {
                url: trimmed.clone(),
                source: e,
            })?;
            *source = trimmed;
        }
        if self.poll_seconds == 0 {
            return Err(ConfigError::Invalid(
                "poll_seconds must be at least 1".to_string(),
            ));
        }
        if self.mount.trim().is_empty() {
            self.mount = Self::DEFAULT_MOUNT.to_string();
        }
        Ok(self)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_seconds)
    }
}

// ============================================================================
// Tests
// ============================================================================
