//! Configuration for the cable parser
//!
//! Loaded through figment so the same structure can come from TOML, YAML or
//! JSON files with `CABLE_` environment overrides layered on top.

use figment::{
    providers::{Env, Format, Json, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{CableSpecError, Result};

/// Environment variable prefix for overrides (e.g. `CABLE_MATCH_TIMEOUT_MS`)
pub const ENV_PREFIX: &str = "CABLE_";

/// Default regex match budget
pub const DEFAULT_MATCH_TIMEOUT_MS: u64 = 1000;

fn default_true() -> bool {
    true
}

fn default_match_timeout_ms() -> u64 {
    DEFAULT_MATCH_TIMEOUT_MS
}

/// Keyword source composition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordConfig {
    /// Include the built-in keyword tables
    #[serde(default = "default_true", alias = "enableBuiltInKeywords")]
    pub enable_builtin_keywords: bool,

    /// External keyword documents, composed in listed order
    #[serde(default, alias = "externalSources")]
    pub external_sources: Vec<PathBuf>,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            enable_builtin_keywords: true,
            external_sources: Vec::new(),
        }
    }
}

/// Top-level parser configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CableConfig {
    #[serde(default)]
    pub keywords: KeywordConfig,

    /// Upper bound for a single grammar match
    #[serde(default = "default_match_timeout_ms", alias = "matchTimeoutMs")]
    pub match_timeout_ms: u64,
}

impl Default for CableConfig {
    fn default() -> Self {
        Self {
            keywords: KeywordConfig::default(),
            match_timeout_ms: DEFAULT_MATCH_TIMEOUT_MS,
        }
    }
}

impl CableConfig {
    pub fn match_timeout(&self) -> Duration {
        Duration::from_millis(self.match_timeout_ms)
    }

    /// Load configuration from a file, with `CABLE_` environment overrides
    ///
    /// The provider is chosen by extension: `toml`, `yaml`/`yml` or `json`.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| CableSpecError::config("Config file must have an extension"))?;

        // Missing keys fall back to the serde defaults
        let figment = match extension.to_ascii_lowercase().as_str() {
            "toml" => Figment::new().merge(Toml::file(path)),
            "yaml" | "yml" => Figment::new().merge(Yaml::file(path)),
            "json" => Figment::new().merge(Json::file(path)),
            _ => {
                return Err(CableSpecError::config(format!(
                    "Unsupported config file format: {}",
                    extension
                )))
            },
        };

        let config: CableConfig = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        tracing::debug!(
            "Loaded cable config from {}: builtin={}, external_sources={}",
            path.display(),
            config.keywords.enable_builtin_keywords,
            config.keywords.external_sources.len()
        );
        Ok(config)
    }
}
