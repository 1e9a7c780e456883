//! Configuration file handling for img-to-ascii.
//!
//! Loads configuration from `<config dir>/img-to-ascii/config.toml` or a custom path.
//! Every key is optional; command-line flags take precedence over the file.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::ascii::{ColorBackend, EdgeBackend, HuePolicy, Ramp};
use crate::pipeline::PipelineConfig;

/// Configuration file structure.
#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub backends: BackendConfig,
    #[serde(default)]
    pub hue: HueConfig,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct OutputConfig {
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub colors: Option<bool>,
    /// "detailed" or "simple"
    pub charset: Option<String>,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct AnalysisConfig {
    pub edges: Option<bool>,
    pub hue: Option<bool>,
    pub threads: Option<usize>,
    pub block_rows: Option<usize>,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct BackendConfig {
    /// "reference" or "accelerated"
    pub edge: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct HueConfig {
    pub saturation_threshold: Option<f32>,
    pub band_start: Option<f32>,
    pub band_end: Option<f32>,
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: &'static str, value: String },
}

fn parse_backend(key: &'static str, value: &str) -> Result<(EdgeBackend, ColorBackend), ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "reference" | "scalar" => Ok((EdgeBackend::Reference, ColorBackend::Reference)),
        "accelerated" | "simd" => Ok((EdgeBackend::Accelerated, ColorBackend::Accelerated)),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}

fn parse_ramp(value: &str) -> Result<Ramp, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "detailed" => Ok(Ramp::Detailed),
        "simple" => Ok(Ramp::Simple),
        _ => Err(ConfigError::InvalidValue {
            key: "output.charset",
            value: value.to_string(),
        }),
    }
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if !path.exists() {
            log::debug!("no config file at {}", path.display());
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let config = Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Whether colored output is enabled by the file (default: on).
    pub fn colors(&self) -> bool {
        self.output.colors.unwrap_or(true)
    }

    /// Build a pipeline configuration from the file on top of the defaults.
    pub fn pipeline_config(&self) -> Result<PipelineConfig, ConfigError> {
        let mut cfg = PipelineConfig::default();

        if let Some(width) = self.output.width {
            cfg.width = width;
        }
        if let Some(height) = self.output.height {
            cfg.height = height;
        }
        if let Some(charset) = &self.output.charset {
            cfg.ramp = parse_ramp(charset)?;
        }

        if let Some(edges) = self.analysis.edges {
            cfg.edges = edges;
        }
        if let Some(hue) = self.analysis.hue {
            cfg.hue = hue;
        }
        if let Some(threads) = self.analysis.threads {
            cfg.threads = threads;
        }
        if let Some(rows) = self.analysis.block_rows {
            cfg.block_rows = rows;
        }

        if let Some(edge) = &self.backends.edge {
            cfg.edge_backend = parse_backend("backends.edge", edge)?.0;
        }
        if let Some(color) = &self.backends.color {
            cfg.color_backend = parse_backend("backends.color", color)?.1;
        }

        let defaults = HuePolicy::default();
        cfg.hue_policy = HuePolicy {
            saturation_threshold: self
                .hue
                .saturation_threshold
                .unwrap_or(defaults.saturation_threshold),
            band_start: self.hue.band_start.unwrap_or(defaults.band_start),
            band_end: self.hue.band_end.unwrap_or(defaults.band_end),
            glyph: defaults.glyph,
        };

        Ok(cfg)
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("img-to-ascii")
        .join("config.toml")
}

/// Contents written by `config init`.
pub const DEFAULT_CONFIG: &str = r#"# img-to-ascii configuration

[output]
# Grid size in characters (height is scaled by 0.75 for cell aspect)
width = 120
height = 60
# 24-bit color escapes
colors = true
# Density ramp: detailed, simple
charset = "detailed"

[analysis]
# Direction glyphs on strong edges
edges = true
# HSV value and hue emphasis instead of luminance
hue = false
# Edge detection workers (0 = all cores, max 64)
threads = 0
# Maximum rows per edge-detection block (0 = rows / threads)
block_rows = 64

[backends]
# reference or accelerated
edge = "reference"
color = "reference"

[hue]
saturation_threshold = 0.15
band_start = 180.0
band_end = 260.0
"#;
