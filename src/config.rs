//! Gallery configuration.
//!
//! Handles loading, validating, and merging a TOML config file on top of the
//! stock defaults. Command-line flags are applied last, by the CLI.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [discovery]
//! extensions = ["JPG", "JPEG", "PNG"]  # matched case-insensitively
//!
//! [images]
//! max_width = 1000          # full-size cap, pixels
//! max_height = 1000
//! quality = 90              # JPEG quality (1-100)
//! subdir = "img"            # under the output directory
//! # prefix = ""             # filename prefix for full-size images
//! # suffix = ""             # inserted before the extension
//!
//! [thumbnails]
//! enabled = true
//! max_width = 400
//! max_height = 400
//! subdir = "thumbnails"
//! prefix = "thumb_"
//! # suffix = ""
//!
//! [page]
//! title = "Web Gallery"
//! filename = "index.html"
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse: override just the values you want:
//!
//! ```toml
//! [thumbnails]
//! enabled = false
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::discovery::ExtensionSet;
use crate::imaging::{Quality, RescaleConfig};
use crate::naming::OutputNaming;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

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

/// Gallery configuration.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Which files count as images.
    pub discovery: DiscoveryConfig,
    /// Full-size renditions.
    pub images: ImagesConfig,
    /// Thumbnail renditions.
    pub thumbnails: ThumbnailsConfig,
    /// The generated HTML page.
    pub page: PageConfig,
}

impl GalleryConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.discovery.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "discovery.extensions must not be empty".into(),
            ));
        }
        if self.images.max_width == 0 || self.images.max_height == 0 {
            return Err(ConfigError::Validation(
                "images.max_width and images.max_height must be non-zero".into(),
            ));
        }
        if !(1..=100).contains(&self.images.quality) {
            return Err(ConfigError::Validation(
                "images.quality must be 1-100".into(),
            ));
        }
        if self.images.subdir.is_empty() {
            return Err(ConfigError::Validation(
                "images.subdir must not be empty".into(),
            ));
        }
        if self.page.filename.is_empty() {
            return Err(ConfigError::Validation(
                "page.filename must not be empty".into(),
            ));
        }
        if self.thumbnails.enabled {
            if self.thumbnails.max_width == 0 || self.thumbnails.max_height == 0 {
                return Err(ConfigError::Validation(
                    "thumbnails.max_width and thumbnails.max_height must be non-zero".into(),
                ));
            }
            if self.thumbnails.subdir.is_empty() {
                return Err(ConfigError::Validation(
                    "thumbnails.subdir must not be empty".into(),
                ));
            }
            if self.thumbnails.subdir == self.images.subdir {
                return Err(ConfigError::Validation(
                    "thumbnails.subdir must differ from images.subdir".into(),
                ));
            }
        }
        Ok(())
    }
}

/// Image discovery settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiscoveryConfig {
    /// File extensions (without dot) treated as images.
    pub extensions: ExtensionSet,
}

/// Full-size rendition settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    pub max_width: u32,
    pub max_height: u32,
    /// JPEG encoding quality, shared by thumbnails.
    pub quality: u32,
    /// Directory under the output root.
    pub subdir: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            max_width: 1000,
            max_height: 1000,
            quality: 90,
            subdir: "img".to_string(),
            prefix: None,
            suffix: None,
        }
    }
}

impl ImagesConfig {
    pub fn rescale(&self) -> RescaleConfig {
        RescaleConfig {
            max_width: self.max_width,
            max_height: self.max_height,
            quality: Quality::new(self.quality),
        }
    }

    pub fn naming(&self, output_root: &Path) -> OutputNaming {
        OutputNaming {
            target_dir: Some(output_root.join(&self.subdir)),
            overwrite: false,
            prefix: self.prefix.clone(),
            suffix: self.suffix.clone(),
        }
    }
}

/// Thumbnail rendition settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailsConfig {
    pub enabled: bool,
    pub max_width: u32,
    pub max_height: u32,
    pub subdir: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_width: 400,
            max_height: 400,
            subdir: "thumbnails".to_string(),
            prefix: Some("thumb_".to_string()),
            suffix: None,
        }
    }
}

impl ThumbnailsConfig {
    pub fn rescale(&self, quality: u32) -> RescaleConfig {
        RescaleConfig {
            max_width: self.max_width,
            max_height: self.max_height,
            quality: Quality::new(quality),
        }
    }

    pub fn naming(&self, output_root: &Path) -> OutputNaming {
        OutputNaming {
            target_dir: Some(output_root.join(&self.subdir)),
            overwrite: false,
            prefix: self.prefix.clone(),
            suffix: self.suffix.clone(),
        }
    }
}

/// HTML page settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageConfig {
    /// Shown in the browser tab and as the page heading.
    pub title: String,
    /// Written directly under the output root.
    pub filename: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: "Web Gallery".to_string(),
            filename: "index.html".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(GalleryConfig::default()).expect("default config must serialize")
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
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(value)
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<GalleryConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: GalleryConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the gallery config.
///
/// With `None`, returns the validated stock defaults. With a path, the file
/// must exist; its values are merged over the defaults.
pub fn load_config(path: Option<&Path>) -> Result<GalleryConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = path.map(load_raw_config).transpose()?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock config file with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Photo Webpage Configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Discovery
# ---------------------------------------------------------------------------
[discovery]
# File extensions treated as images, matched case-insensitively.
# Only files directly inside the input directories are considered.
extensions = ["JPG", "JPEG", "PNG"]

# ---------------------------------------------------------------------------
# Full-size images
# ---------------------------------------------------------------------------
[images]
# Images larger than this are scaled down; smaller ones are never enlarged.
max_width = 1000
max_height = 1000

# JPEG encoding quality (1 = worst, 100 = best). Also used for thumbnails.
quality = 90

# Directory under the output directory.
subdir = "img"

# Optional filename prefix / suffix (suffix goes before the extension).
# prefix = "web_"
# suffix = "_1000"

# ---------------------------------------------------------------------------
# Thumbnails
# ---------------------------------------------------------------------------
[thumbnails]
# When disabled, the page shows the full-size images directly.
enabled = true

max_width = 400
max_height = 400

subdir = "thumbnails"
prefix = "thumb_"
# suffix = "_small"

# ---------------------------------------------------------------------------
# Page
# ---------------------------------------------------------------------------
[page]
title = "Web Gallery"

# Written directly under the output directory.
filename = "index.html"
"##
}
