//! Configuration loading, validation, and management for Packloom.
//!
//! Loads configuration from `~/.packloom/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The reserved separator literal placed between concatenated document
/// bodies. Consumers split on this token to recover individual documents,
/// so it must stay stable for a deployment. The hex suffix exists to make
/// collisions with ordinary Markdown content improbable; deployments that
/// want a different token set `packing.separator` in config.
pub const DEFAULT_SEPARATOR: &str = "\n\n--8<-- pack-boundary-magic-5f3759df --8<--\n\n";

/// The root configuration structure.
///
/// Maps directly to `~/.packloom/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Document store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Relevance scoring configuration
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Context packing configuration
    #[serde(default)]
    pub packing: PackingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backend: "file", "sqlite", or "in_memory"
    #[serde(default = "default_store_backend")]
    pub backend: String,

    /// Corpus directory for the file backend
    #[serde(default = "default_corpus_dir")]
    pub corpus_dir: PathBuf,

    /// Database path for the sqlite backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sqlite_path: Option<PathBuf>,
}

fn default_store_backend() -> String {
    "file".into()
}
fn default_corpus_dir() -> PathBuf {
    AppConfig::config_dir().join("packs")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_store_backend(),
            corpus_dir: default_corpus_dir(),
            sqlite_path: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Days for a document to lose half its freshness weight
    #[serde(default = "default_half_life_days")]
    pub freshness_half_life_days: f64,

    /// Verification age beyond which a document is flagged stale
    #[serde(default = "default_stale_days")]
    pub stale_days: i64,

    /// Minimum score for a candidate to be eligible for packing
    #[serde(default)]
    pub min_score: f64,
}

fn default_half_life_days() -> f64 {
    180.0
}
fn default_stale_days() -> i64 {
    365
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            freshness_half_life_days: default_half_life_days(),
            stale_days: default_stale_days(),
            min_score: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackingConfig {
    /// Default byte budget when the caller doesn't set one
    #[serde(default = "default_budget_bytes")]
    pub default_budget_bytes: usize,

    /// Safety cap on candidates the packer will scan
    #[serde(default = "default_max_candidates")]
    pub max_candidates_scanned: usize,

    /// The reserved separator literal between packed documents
    #[serde(default = "default_separator")]
    pub separator: String,
}

fn default_budget_bytes() -> usize {
    16 * 1024
}
fn default_max_candidates() -> usize {
    500
}
fn default_separator() -> String {
    DEFAULT_SEPARATOR.into()
}

impl Default for PackingConfig {
    fn default() -> Self {
        Self {
            default_budget_bytes: default_budget_bytes(),
            max_candidates_scanned: default_max_candidates(),
            separator: default_separator(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.packloom/config.toml).
    ///
    /// Environment variable overrides (highest priority):
    /// - `PACKLOOM_CORPUS_DIR` — corpus directory for the file backend
    /// - `PACKLOOM_STORE_BACKEND` — store backend name
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if let Ok(dir) = std::env::var("PACKLOOM_CORPUS_DIR") {
            config.store.corpus_dir = PathBuf::from(dir);
        }
        if let Ok(backend) = std::env::var("PACKLOOM_STORE_BACKEND") {
            config.store.backend = backend;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".packloom")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scoring.freshness_half_life_days <= 0.0 {
            return Err(ConfigError::ValidationError(
                "scoring.freshness_half_life_days must be > 0".into(),
            ));
        }
        if self.scoring.stale_days <= 0 {
            return Err(ConfigError::ValidationError(
                "scoring.stale_days must be > 0".into(),
            ));
        }
        if self.packing.max_candidates_scanned == 0 {
            return Err(ConfigError::ValidationError(
                "packing.max_candidates_scanned must be > 0".into(),
            ));
        }
        if self.packing.separator.is_empty() {
            return Err(ConfigError::ValidationError(
                "packing.separator must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Generate a default config TOML string (for first-run setup).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            scoring: ScoringConfig::default(),
            packing: PackingConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
