//! Configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. User values are
//! layered over stock defaults as TOML tables, so a config file only needs
//! the keys it wants to override. Unknown keys are rejected.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! input_dir = "input_images_folder"    # Images to process (top level only)
//! output_dir = "output_images_folder"  # Cleared before every batch run
//!
//! [filters]
//! tone = 0.0      # Sepia duotone intensity, 0-1
//! resize = 100    # Scale percent, 10-200
//! blur = 0.0      # Gaussian radius, 0-2
//! sharpen = 0.0   # Unsharp mask factor, 0-2
//! edge = 0.0      # Edge enhance factor, 0-2
//!
//! [output]
//! jpeg_quality = 90  # 1-100
//!
//! [processing]
//! max_processes = 4  # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! ```toml
//! [filters]
//! resize = 50
//! ```
//!
//! Everything not named keeps its default. Filter values are range checked
//! here; the engine itself trusts whatever it is given.

use crate::imaging::{ParameterSet, Quality};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `config.toml`.
///
/// All fields have defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Folder scanned for input images.
    pub input_dir: PathBuf,
    /// Folder the batch writes to. Every regular file in it is deleted
    /// before a run.
    pub output_dir: PathBuf,
    /// Initial filter values.
    pub filters: ParameterSet,
    /// Encoder settings.
    pub output: OutputConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input_images_folder"),
            output_dir: PathBuf::from("output_images_folder"),
            filters: ParameterSet::default(),
            output: OutputConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl Config {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(name) = self.filters.out_of_range() {
            return Err(ConfigError::Validation(format!(
                "filters.{name} is out of range"
            )));
        }
        if !(1..=100).contains(&self.output.jpeg_quality) {
            return Err(ConfigError::Validation(
                "output.jpeg_quality must be 1-100".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        check_folders(&self.input_dir, &self.output_dir)
    }
}

/// Reject an output folder that is also the input folder.
///
/// Clearing the output folder would otherwise delete the inputs. Both
/// folders are resolved first, so `./photos`, `photos`, `a/../photos` and
/// a symlink to `photos` all count as the same folder.
pub fn check_folders(input_dir: &Path, output_dir: &Path) -> Result<(), ConfigError> {
    if resolve_folder(input_dir) == resolve_folder(output_dir) {
        return Err(ConfigError::Validation(format!(
            "input_dir and output_dir must differ (both are {})",
            input_dir.display()
        )));
    }
    Ok(())
}

/// Absolute, symlink-free form of `path` for comparison.
///
/// An existing folder is canonicalized. A missing one is resolved through
/// its parent, since the output folder is created on first run.
fn resolve_folder(path: &Path) -> PathBuf {
    if let Ok(resolved) = path.canonicalize() {
        return resolved;
    }
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    match (parent.canonicalize(), path.file_name()) {
        (Ok(parent), Some(name)) => parent.join(name),
        _ => std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf()),
    }
}

/// Encoder settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// JPEG quality for `.jpg`/`.jpeg` outputs. Other formats are lossless.
    pub jpeg_quality: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: Quality::default().value(),
        }
    }
}

impl OutputConfig {
    pub fn quality(&self) -> Quality {
        Quality::new(self.jpeg_quality)
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel image processing workers.
    /// When absent, defaults to the number of CPU cores.
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
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(Config::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
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
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<Config, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: Config = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to defaults when it is missing.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    if overlay.is_none() {
        tracing::debug!("no config at {}, using defaults", path.display());
    }
    resolve_config(base, overlay)
}

/// Like [`load_config`], but a missing file is an error.
///
/// Used when the path was given explicitly.
pub fn load_required_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    load_config(path)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Photo Filters Configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Unknown keys will cause an error.

# Folder scanned for .jpg, .jpeg and .png files (top level only).
input_dir = "input_images_folder"

# Folder results are written to. WARNING: every file directly inside it
# is deleted at the start of each run.
output_dir = "output_images_folder"

# ---------------------------------------------------------------------------
# Filters
# ---------------------------------------------------------------------------
# Initial filter values. Command-line flags override these.
# Transforms always run in this order: tone, resize, blur, sharpen, edge.
# A value at its default is skipped during batch runs.
[filters]
# Sepia duotone blended over the original (0 = off, 1 = full sepia).
tone = 0.0

# Output size in percent of the input (10-200). The image is scaled and
# center cropped so its aspect ratio never changes.
resize = 100

# Gaussian blur radius in pixels (0-2).
blur = 0.0

# Unsharp mask strength (0-2, 1 = 100%).
sharpen = 0.0

# Edge enhancement (0-2). Values above 1 exaggerate edges further.
edge = 0.0

# ---------------------------------------------------------------------------
# Output encoding
# ---------------------------------------------------------------------------
[output]
# JPEG encoding quality (1 = worst, 100 = best). PNG output is lossless.
jpeg_quality = 90

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel image-processing workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
