//! Resource-bounding parameters for inspection.
//!
//! All limits (per-pattern offset cap, pattern count, search match cap, ...) are
//! explicit configuration with the defaults below rather than hidden constants.
//!
//! A config can be loaded from:
//! - `.json` files (serde_json)
//! - `.yaml` / `.yml` files (serde_yaml)
//! - anything else, parsed as plain `key = value` lines

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration parsing and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown config key '{0}'")]
    UnknownKey(String),

    #[error("Invalid value '{value}' for config key '{key}'")]
    InvalidValue { key: String, value: String },

    #[error("Line {line} is not a `key = value` pair: {content}")]
    MalformedLine { line: usize, content: String },

    #[error("Config value '{0}' must be greater than zero")]
    Zero(&'static str),

    #[error("text_threshold must be within 0.0..=1.0, got {0}")]
    ThresholdOutOfRange(f64),
}

/// Tunable parameters shared by every inspection component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectConfig {
    /// Bytes rendered per hex dump line.
    pub bytes_per_line: usize,
    /// Leading bytes handed to signature detection.
    pub signature_len: usize,
    /// Bytes sampled by the text heuristic.
    pub text_sample_size: usize,
    /// Maximum share of non-printable bytes for a sample to count as text.
    pub text_threshold: f64,
    /// Entries in the most-frequent-bytes list.
    pub top_bytes: usize,
    pub min_pattern_length: usize,
    /// Number of consecutive pattern lengths scanned, starting at `min_pattern_length`.
    pub pattern_length_window: usize,
    pub max_patterns: usize,
    pub max_offsets_per_pattern: usize,
    /// Patterns listed in the text report.
    pub report_patterns: usize,
    pub search_max_results: usize,
    pub context_lines: usize,
    pub max_differences: usize,
    /// Chunk size for streaming transforms and comparisons.
    pub chunk_size: usize,
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            bytes_per_line: 16,
            signature_len: 16,
            text_sample_size: 512,
            text_threshold: 0.3,
            top_bytes: 10,
            min_pattern_length: 4,
            pattern_length_window: 4,
            max_patterns: 20,
            max_offsets_per_pattern: 100,
            report_patterns: 10,
            search_max_results: 50,
            context_lines: 2,
            max_differences: 100,
            chunk_size: 8192,
        }
    }
}

impl InspectConfig {
    /// Reject values that would make rendering or streaming meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bytes_per_line == 0 {
            return Err(ConfigError::Zero("bytes_per_line"));
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::Zero("chunk_size"));
        }
        if !(0.0..=1.0).contains(&self.text_threshold) {
            return Err(ConfigError::ThresholdOutOfRange(self.text_threshold));
        }
        Ok(())
    }

    /// Apply a single `key = value` override.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
            value
                .parse()
                .map_err(|_| ConfigError::InvalidValue { key: key.into(), value: value.into() })
        }

        match key {
            "bytes_per_line" => self.bytes_per_line = parse(key, value)?,
            "signature_len" => self.signature_len = parse(key, value)?,
            "text_sample_size" => self.text_sample_size = parse(key, value)?,
            "text_threshold" => self.text_threshold = parse(key, value)?,
            "top_bytes" => self.top_bytes = parse(key, value)?,
            "min_pattern_length" => self.min_pattern_length = parse(key, value)?,
            "pattern_length_window" => self.pattern_length_window = parse(key, value)?,
            "max_patterns" => self.max_patterns = parse(key, value)?,
            "max_offsets_per_pattern" => self.max_offsets_per_pattern = parse(key, value)?,
            "report_patterns" => self.report_patterns = parse(key, value)?,
            "search_max_results" => self.search_max_results = parse(key, value)?,
            "context_lines" => self.context_lines = parse(key, value)?,
            "max_differences" => self.max_differences = parse(key, value)?,
            "chunk_size" => self.chunk_size = parse(key, value)?,
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    /// Parse `key = value` lines on top of the defaults.
    ///
    /// Blank lines and lines starting with `#` are skipped. Each line is split at
    /// the first `=`; keys and values are trimmed.
    pub fn from_key_value_str(input: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        for (idx, raw) in input.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (key, value) = line.split_once('=').ok_or_else(|| ConfigError::MalformedLine {
                line: idx + 1,
                content: line.to_string(),
            })?;
            config.set(key.trim(), value.trim())?;
        }
        Ok(config)
    }
}

/// Load and validate a config file, choosing the format from its extension.
pub fn load_config(path: &Path) -> Result<InspectConfig> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config at {}", path.display()))?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default().to_ascii_lowercase();
    let config: InspectConfig = match ext.as_str() {
        "json" => serde_json::from_str(&body).context("Failed to parse config JSON")?,
        "yaml" | "yml" => serde_yaml::from_str(&body).context("Failed to parse config YAML")?,
        _ => InspectConfig::from_key_value_str(&body)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?,
    };
    config.validate().with_context(|| format!("Invalid config at {}", path.display()))?;
    log::debug!("loaded config from {}: {:?}", path.display(), config);
    Ok(config)
}
