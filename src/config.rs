//! Configuration file support for career-tree.
//!
//! Provides YAML-based configuration through `career-tree.config.yml` files,
//! including data structures, file loading, validation and the resolved
//! runtime [`Settings`].

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

use crate::adapters::outbound::network::{
    RecalculationCacheSettings, DEFAULT_DEBOUNCE, DEFAULT_TIMEOUT,
};
use crate::career_graph::services::{RingGeometry, SignatureStrategy, DEFAULT_GRID_SIZE};
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "career-tree.config.yml";

/// API base used when neither the command line nor the config file names one
pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api";

/// Environment variable holding the bearer token unless configured otherwise
pub const DEFAULT_TOKEN_ENV: &str = "CAREER_TREE_API_TOKEN";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub api_base: Option<String>,
    pub api_token_env: Option<String>,
    pub grid_size: Option<f64>,
    #[serde(default)]
    pub layout: LayoutSection,
    #[serde(default)]
    pub recalculation: RecalculationSection,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// `layout:` section
#[derive(Debug, Deserialize, Default)]
pub struct LayoutSection {
    pub signature: Option<SignatureStrategy>,
    pub base_radius: Option<f64>,
    pub ring_spacing: Option<f64>,
    pub anchor_radius: Option<f64>,
    pub max_levels: Option<usize>,
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// `recalculation:` section
#[derive(Debug, Deserialize, Default)]
pub struct RecalculationSection {
    pub cache_ttl_secs: Option<u64>,
    pub max_cache_entries: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub debounce_ms: Option<u64>,
    pub mock_fallback: Option<bool>,
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

fn ensure_positive(name: &str, value: Option<f64>) -> Result<()> {
    if let Some(value) = value {
        if !value.is_finite() || value <= 0.0 {
            bail!(
                "Invalid config: {} must be a positive number (got {}).",
                name,
                value
            );
        }
    }
    Ok(())
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Some(ref api_base) = config.api_base {
        validate_api_base(api_base)?;
    }
    if let Some(ref variable) = config.api_token_env {
        if variable.trim().is_empty() {
            bail!("Invalid config: api_token_env must not be empty.");
        }
    }

    ensure_positive("grid_size", config.grid_size)?;
    ensure_positive("layout.base_radius", config.layout.base_radius)?;
    ensure_positive("layout.ring_spacing", config.layout.ring_spacing)?;
    ensure_positive("layout.anchor_radius", config.layout.anchor_radius)?;
    if config.layout.max_levels == Some(0) {
        bail!("Invalid config: layout.max_levels must be at least 1.");
    }

    let recalculation = &config.recalculation;
    if recalculation.cache_ttl_secs == Some(0) {
        bail!(
            "Invalid config: recalculation.cache_ttl_secs must be greater than 0.\n\n\
             💡 Hint: Pass --no-cache on the command line to bypass the cache instead."
        );
    }
    if recalculation.max_cache_entries == Some(0) {
        bail!("Invalid config: recalculation.max_cache_entries must be greater than 0.");
    }
    if recalculation.timeout_secs == Some(0) {
        bail!("Invalid config: recalculation.timeout_secs must be greater than 0.");
    }
    Ok(())
}

/// Checks that `api_base` is an absolute http(s) URL
pub fn validate_api_base(api_base: &str) -> Result<()> {
    let url = reqwest::Url::parse(api_base).with_context(|| {
        format!(
            "Invalid API base URL: {}\n\n💡 Hint: Use an absolute URL such as {}",
            api_base, DEFAULT_API_BASE
        )
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!(
            "Invalid API base URL: {} (scheme must be http or https)",
            api_base
        );
    }
    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    let sections = [
        ("", &config.unknown_fields),
        ("layout.", &config.layout.unknown_fields),
        ("recalculation.", &config.recalculation.unknown_fields),
    ];
    for (prefix, fields) in sections {
        for key in fields.keys() {
            warn!("Unknown config field '{}{}' will be ignored", prefix, key);
        }
    }
}

/// Runtime settings: built-in defaults overlaid with the config file
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_base: String,
    pub api_token_env: String,
    pub grid_size: f64,
    pub ring_geometry: RingGeometry,
    pub signature: SignatureStrategy,
    pub cache: RecalculationCacheSettings,
    pub timeout: Duration,
    pub debounce: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_token_env: DEFAULT_TOKEN_ENV.to_string(),
            grid_size: DEFAULT_GRID_SIZE,
            ring_geometry: RingGeometry::default(),
            signature: SignatureStrategy::default(),
            cache: RecalculationCacheSettings::default(),
            timeout: DEFAULT_TIMEOUT,
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

impl Settings {
    pub fn from_config(config: &ConfigFile) -> Self {
        let defaults = Self::default();
        let layout = &config.layout;
        let recalculation = &config.recalculation;

        Self {
            api_base: config.api_base.clone().unwrap_or(defaults.api_base),
            api_token_env: config
                .api_token_env
                .clone()
                .unwrap_or(defaults.api_token_env),
            grid_size: config.grid_size.unwrap_or(defaults.grid_size),
            ring_geometry: RingGeometry {
                base_radius: layout
                    .base_radius
                    .unwrap_or(defaults.ring_geometry.base_radius),
                ring_spacing: layout
                    .ring_spacing
                    .unwrap_or(defaults.ring_geometry.ring_spacing),
                anchor_radius: layout
                    .anchor_radius
                    .unwrap_or(defaults.ring_geometry.anchor_radius),
                max_levels: layout.max_levels.unwrap_or(defaults.ring_geometry.max_levels),
            },
            signature: layout.signature.unwrap_or(defaults.signature),
            cache: RecalculationCacheSettings {
                ttl: recalculation
                    .cache_ttl_secs
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.cache.ttl),
                max_entries: recalculation
                    .max_cache_entries
                    .unwrap_or(defaults.cache.max_entries),
                mock_fallback: recalculation
                    .mock_fallback
                    .unwrap_or(defaults.cache.mock_fallback),
            },
            timeout: recalculation
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            debounce: recalculation
                .debounce_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.debounce),
        }
    }
}
