//! Bundle configuration.
//!
//! Loaded from an optional TOML file passed with `--config`. Every key is
//! optional; anything left out keeps the stock default.
//!
//! ## Configuration Options
//!
//! ```toml
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//!
//! [encoding]
//! filter = "lanczos3"       # lanczos3 | catmull-rom | gaussian | triangle
//! compression = "default"   # fast | default | best
//!
//! [descriptor]
//! path = "web/manifest.json"  # Use this file as manifest.json
//! # url = "https://example.com/manifest.json"  # needs the `http` feature
//! ```
//!
//! Icon sizes and output filenames are fixed and not configurable.
//! Unknown keys are rejected to catch typos early.

use crate::descriptor::{DescriptorSource, FileDescriptor, StaticDescriptor};
use crate::imaging::{EncodeParams, PngCompression, ResampleFilter};
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
    #[error("Config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BundleConfig {
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
    /// Resampling and PNG encoding settings.
    pub encoding: EncodingConfig,
    /// Where `manifest.json` comes from.
    pub descriptor: DescriptorConfig,
}

impl BundleConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        if self.descriptor.path.is_some() && self.descriptor.url.is_some() {
            return Err(ConfigError::Validation(
                "descriptor.path and descriptor.url are mutually exclusive".into(),
            ));
        }
        if self.descriptor.url.is_some() && !cfg!(feature = "http") {
            return Err(ConfigError::Validation(
                "descriptor.url requires building with the `http` feature".into(),
            ));
        }
        Ok(())
    }

    pub fn encode_params(&self) -> EncodeParams {
        EncodeParams {
            filter: self.encoding.filter,
            compression: self.encoding.compression,
        }
    }

    /// Build the configured descriptor source.
    pub fn descriptor_source(&self) -> Box<dyn DescriptorSource> {
        #[cfg(feature = "http")]
        {
            if let Some(url) = &self.descriptor.url {
                return Box::new(crate::descriptor::HttpDescriptor::new(url.clone()));
            }
        }
        match &self.descriptor.path {
            Some(path) => Box::new(FileDescriptor::new(path)),
            None => Box::new(StaticDescriptor::default()),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel resample/encode workers.
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

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncodingConfig {
    pub filter: ResampleFilter,
    pub compression: PngCompression,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DescriptorConfig {
    pub path: Option<PathBuf>,
    pub url: Option<String>,
}

/// Load and validate a config file.
pub fn load_config(path: &Path) -> Result<BundleConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<BundleConfig, ConfigError> {
    let config: BundleConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock config with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Simple Favicon Configuration
# ============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.
#
# Icon sizes (256, 128, 64, 48, 32, 16 in favicon.ico, plus 192.png and
# 512.png) and archive entry names are fixed.

# ---------------------------------------------------------------------------
# Parallel processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel resample/encode workers. Omit to use every CPU core.
# Values above the core count are clamped down.
# max_processes = 4

# ---------------------------------------------------------------------------
# Resampling and PNG encoding
# ---------------------------------------------------------------------------
[encoding]
# Interpolation filter: "lanczos3", "catmull-rom", "gaussian" or "triangle".
filter = "lanczos3"

# PNG compression effort: "fast", "default" or "best".
compression = "default"

# ---------------------------------------------------------------------------
# Descriptor (manifest.json)
# ---------------------------------------------------------------------------
[descriptor]
# By default the built-in web app manifest is bundled.
# Point at a file to bundle it verbatim instead:
# path = "manifest.json"
#
# Or fetch it over HTTP (requires the `http` feature):
# url = "https://example.com/manifest.json"
"##
}
