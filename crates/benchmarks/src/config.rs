// Copyright 2025 Search Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Benchmark tooling configuration.
//!
//! Values resolve in order: built-in defaults, an optional TOML file, then
//! `SEARCH_BENCH_*` environment variables. Command-line flags are applied on
//! top by the CLI.
//!
//! # Example
//!
//! ```toml
//! build_dir = "build"
//! artifact_name = "results.json"
//! default_category = "TOP_10"
//! annotations = "annotations.json"
//! log_level = "info"
//! ```

use search_bench_core::{ARTIFACT_FILE, DEFAULT_CATEGORY};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config file {}: {source}", path.display())]
    Io {
        /// Config file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`BenchConfig`].
    #[error("Invalid config file {}: {source}", path.display())]
    Toml {
        /// Config file path.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// A value is present but unusable.
    #[error("Invalid configuration value for {key}: {reason}")]
    InvalidValue {
        /// Configuration key.
        key: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Environment variable names mapped to configuration keys.
pub const ENV_BUILD_DIR: &str = "SEARCH_BENCH_BUILD_DIR";
/// Artifact file name override.
pub const ENV_ARTIFACT: &str = "SEARCH_BENCH_ARTIFACT";
/// Default category override.
pub const ENV_DEFAULT_CATEGORY: &str = "SEARCH_BENCH_DEFAULT_CATEGORY";
/// Annotation file override.
pub const ENV_ANNOTATIONS: &str = "SEARCH_BENCH_ANNOTATIONS";
/// Log level override.
pub const ENV_LOG_LEVEL: &str = "SEARCH_BENCH_LOG_LEVEL";

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BenchConfig {
    /// Root of the build tree holding one directory per run.
    pub build_dir: PathBuf,
    /// Artifact file name inside each run directory.
    pub artifact_name: String,
    /// Category shown first.
    pub default_category: String,
    /// Annotation table (JSON), if any.
    pub annotations: Option<PathBuf>,
    /// Log level used when `RUST_LOG` is not set.
    pub log_level: String,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            build_dir: PathBuf::from("build"),
            artifact_name: ARTIFACT_FILE.to_string(),
            default_category: DEFAULT_CATEGORY.to_string(),
            annotations: None,
            log_level: "info".to_string(),
        }
    }
}

impl BenchConfig {
    /// Load defaults, then `path` if given, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.load_from_env();
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML file; missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `SEARCH_BENCH_*` variables from the process environment.
    pub fn load_from_env(&mut self) {
        self.apply_env(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`. Empty values and unknown log levels are
    /// ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(value) = get(ENV_BUILD_DIR) {
            self.build_dir = PathBuf::from(value);
        }
        if let Some(value) = get(ENV_ARTIFACT) {
            self.artifact_name = value;
        }
        if let Some(value) = get(ENV_DEFAULT_CATEGORY) {
            self.default_category = value;
        }
        if let Some(value) = get(ENV_ANNOTATIONS) {
            self.annotations = Some(PathBuf::from(value));
        }
        if let Some(value) = get(ENV_LOG_LEVEL) {
            let level = value.to_lowercase();
            if is_known_level(&level) {
                self.log_level = level;
            } else {
                warn!(variable = ENV_LOG_LEVEL, value = %value, "ignoring unknown log level");
            }
        }
    }

    /// Check that values are usable.
    pub fn validate(&self) -> Result<()> {
        if self.artifact_name.is_empty() || self.artifact_name.contains(['/', '\\']) {
            return Err(ConfigError::InvalidValue {
                key: "artifact_name",
                reason: format!("{:?} is not a plain file name", self.artifact_name),
            });
        }
        if !is_known_level(&self.log_level) {
            return Err(ConfigError::InvalidValue {
                key: "log_level",
                reason: format!("unknown level {:?}", self.log_level),
            });
        }
        Ok(())
    }
}

fn is_known_level(level: &str) -> bool {
    matches!(level, "trace" | "debug" | "info" | "warn" | "error" | "off")
}
