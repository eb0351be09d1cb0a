//! Server configuration module.
//!
//! Handles loading, validating, and merging the `iiif-jp2.toml` file. Stock
//! defaults are the base layer; a user file overrides just the keys it names.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! base_url = "http://localhost:12415/iiif"  # Prefix for info.json @id
//!
//! [features]
//! level = "all"       # level0 | level1 | level2 | all
//! enable = []         # Extra IIIF feature names, e.g. ["webp", "gif"]
//! disable = []        # Feature names to switch off, e.g. ["mirroring"]
//!
//! [[features.tile_sizes]]   # Advertised for untiled sources only
//! width = 512
//! scale_factors = [1, 2, 4, 8]
//!
//! [limits]
//! max_width = 4096    # Omit any limit for "no limit"
//! max_height = 4096
//! max_area = 16777216
//!
//! [processing]
//! max_processes = 4   # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys and unknown feature names are rejected to catch typos early.

use crate::iiif::{Feature, FeatureSet, Id, TileSize};
use crate::imaging::Constraint;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Server configuration loaded from `iiif-jp2.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Public URL of the IIIF endpoint, without a trailing slash.
    pub base_url: String,
    /// Which IIIF features this server offers.
    pub features: FeaturesConfig,
    /// Output size limits, also used for `max` sizes.
    pub limits: LimitsConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

fn default_base_url() -> String {
    "http://localhost:12415/iiif".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            features: FeaturesConfig::default(),
            limits: LimitsConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::Validation(
                "base_url must be an http:// or https:// URL".into(),
            ));
        }
        if let Some(feature) = self
            .features
            .enable
            .iter()
            .find(|f| self.features.disable.contains(*f))
        {
            return Err(ConfigError::Validation(format!(
                "feature {feature} is both enabled and disabled"
            )));
        }
        if self.features.tile_sizes.iter().any(|t| t.width == 0) {
            return Err(ConfigError::Validation(
                "features.tile_sizes widths must be non-zero".into(),
            ));
        }
        if self.limits.max_width == Some(0)
            || self.limits.max_height == Some(0)
            || self.limits.max_area == Some(0)
        {
            return Err(ConfigError::Validation(
                "limits must be non-zero when set".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// The feature set described by `[features]`.
    pub fn feature_set(&self) -> FeatureSet {
        let mut set = self.features.level.feature_set();
        for &feature in &self.features.enable {
            set.enable(feature);
        }
        for &feature in &self.features.disable {
            set.disable(feature);
        }
        set.tile_sizes = self.features.tile_sizes.clone();
        set
    }

    /// The output constraint described by `[limits]`.
    pub fn constraint(&self) -> Constraint {
        let unlimited = Constraint::unlimited();
        Constraint {
            width: self.limits.max_width.unwrap_or(unlimited.width),
            height: self.limits.max_height.unwrap_or(unlimited.height),
            area: self.limits.max_area.unwrap_or(unlimited.area),
        }
    }

    /// Base URI of an image, as used for info.json `@id`.
    pub fn image_url(&self, id: &Id) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), id.escaped())
    }
}

/// Named starting points for `[features]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelPreset {
    Level0,
    Level1,
    Level2,
    /// Level 2 plus everything else this crate can plan.
    #[default]
    All,
}

impl LevelPreset {
    pub fn feature_set(self) -> FeatureSet {
        match self {
            LevelPreset::Level0 => FeatureSet::level0(),
            LevelPreset::Level1 => FeatureSet::level1(),
            LevelPreset::Level2 => FeatureSet::level2(),
            LevelPreset::All => FeatureSet::all(),
        }
    }
}

/// Feature negotiation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeaturesConfig {
    pub level: LevelPreset,
    /// Features added on top of the preset.
    pub enable: Vec<Feature>,
    /// Features removed from the preset.
    pub disable: Vec<Feature>,
    /// Tile sizes advertised for sources without native tiles.
    pub tile_sizes: Vec<TileSize>,
}

/// Output limits. A missing value means no limit on that axis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    pub max_area: Option<u64>,
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel header-scanning workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer that user overrides are merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(ServerConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely, so an
///   `enable` list replaces the default list rather than extending it.
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

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file doesn't exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    debug!(path = %path.display(), "loaded config file");
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ServerConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ServerConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the given file.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `iiif-jp2.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# iiif-jp2 Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# Public URL of the IIIF endpoint. Used to build the "@id" of info.json.
base_url = "http://localhost:12415/iiif"

# ---------------------------------------------------------------------------
# IIIF features
# ---------------------------------------------------------------------------
[features]
# Starting point: level0, level1, level2, or all (level2 plus regionSquare,
# sizeAboveFull, mirroring and tif).
level = "all"

# IIIF 2.1 feature names to add to the level, e.g. ["webp", "gif"].
enable = []

# Feature names to remove from the level, e.g. ["mirroring"].
disable = []

# Tile sizes advertised in info.json for sources that have no native tiles.
# [[features.tile_sizes]]
# width = 512
# scale_factors = [1, 2, 4, 8]

# ---------------------------------------------------------------------------
# Output limits
# ---------------------------------------------------------------------------
[limits]
# Requests producing anything larger are refused. "max" sizes are scaled to
# fit. Omit a limit to leave that axis unlimited.
# max_width = 4096
# max_height = 4096
# max_area = 16777216

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel workers for batch header scans.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
