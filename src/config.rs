//! Site configuration module.
//!
//! Handles loading, validating, and merging the `config.toml` in the content
//! root. Stock defaults are serialized to TOML and the user's file is merged
//! on top, so a config only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # Content groups, in declaration order. Each group becomes the `section`
//! # of its index records and the first URL segment of derived URLs.
//! [[groups]]
//! name = "articles"
//! glob = "articles/**/*.md"
//!
//! [[groups]]
//! name = "resources"
//! glob = "resources/*.md"
//!
//! [index]
//! file = "search-index.json"   # Written into the output directory
//!
//! [search]
//! runtime_library = "vendor/lunr.min.js"  # Optional, relative to content root
//! output_dir = "assets/js"                # Where the library is copied
//!
//! [processing]
//! max_processes = 4            # Max parallel parse workers (omit for auto)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use globset::{Glob, GlobBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Content groups in declaration order.
    pub groups: Vec<GroupConfig>,
    /// Search index output settings.
    pub index: IndexConfig,
    /// Passthrough copy of the ranking engine's runtime library.
    pub search: SearchConfig,
    /// Parallel parsing settings.
    pub processing: ProcessingConfig,
}

impl SiteConfig {
    /// Validate config values are usable before scanning starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.groups.is_empty() {
            return Err(ConfigError::Validation(
                "at least one [[groups]] entry is required".into(),
            ));
        }
        let mut seen = HashSet::new();
        for group in &self.groups {
            let name = group.name.trim();
            if name.is_empty() {
                return Err(ConfigError::Validation("groups.name must not be empty".into()));
            }
            if name.contains('/') {
                return Err(ConfigError::Validation(format!(
                    "groups.name '{name}' must not contain '/'"
                )));
            }
            if !seen.insert(name) {
                return Err(ConfigError::Validation(format!(
                    "duplicate group name '{name}'"
                )));
            }
            group_glob(&group.glob).map_err(|e| {
                ConfigError::Validation(format!("invalid glob for group '{name}': {e}"))
            })?;
        }
        if self.index.file.trim().is_empty() {
            return Err(ConfigError::Validation("index.file must not be empty".into()));
        }
        Ok(())
    }
}

/// Compile a group glob. `*` and `?` stop at `/`; only `**` crosses
/// directories.
pub fn group_glob(pattern: &str) -> Result<Glob, globset::Error> {
    GlobBuilder::new(pattern).literal_separator(true).build()
}

/// One content group: a name plus a glob over paths relative to the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupConfig {
    pub name: String,
    pub glob: String,
}

/// Search index output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfig {
    /// File name of the emitted index, relative to the output directory.
    pub file: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            file: "search-index.json".to_string(),
        }
    }
}

/// Ranking engine runtime library passthrough.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Path to the engine's browser runtime, relative to the content root.
    /// When absent nothing is copied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime_library: Option<String>,
    /// Directory under the output root the runtime is copied into.
    pub output_dir: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            runtime_library: None,
            output_dir: "assets/js".to_string(),
        }
    }
}

/// Parallel parsing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel document parsing workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)`, never less than one
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("stock defaults: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay, arrays included, replace base values.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load config from `config.toml` in the content root.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match load_raw_config(root)? {
        Some(overlay) => merge_toml(base, overlay),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    tracing::debug!(groups = config.groups.len(), "loaded site config");
    Ok(config)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# facetsite configuration
# =======================
# Place this file at the root of the content directory.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Content groups
# ---------------------------------------------------------------------------
# Groups are indexed in the order they are declared. Within a group,
# documents follow directory order (an NNN- filename prefix sorts them).
# The group name becomes each record's `section` and the first segment of
# URLs derived from file names.
[[groups]]
name = "articles"
glob = "articles/**/*.md"

# [[groups]]
# name = "resources"
# glob = "resources/*.md"

# ---------------------------------------------------------------------------
# Search index
# ---------------------------------------------------------------------------
[index]
# File name of the emitted index, relative to the output directory.
file = "search-index.json"

# ---------------------------------------------------------------------------
# Ranking engine runtime
# ---------------------------------------------------------------------------
[search]
# Browser runtime of the ranking engine, copied as-is into the output.
# runtime_library = "vendor/lunr.min.js"

# Directory under the output root that receives the runtime.
output_dir = "assets/js"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel document-parsing workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
