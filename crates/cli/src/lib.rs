pub mod commands;

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use bytelens_core::config::{load_config, InspectConfig};
use bytelens_core::store::FileStore;
use bytelens_core::FileInspector;

/// Load the config at `path`, or fall back to defaults when none is given.
pub fn load_config_or_default(path: Option<&Path>) -> Result<InspectConfig> {
    match path {
        Some(p) => load_config(p),
        None => {
            log::debug!("no config file given; using defaults");
            Ok(InspectConfig::default())
        }
    }
}

/// Build an inspector over the file at `path`.
pub fn open_inspector(path: &str, config: &InspectConfig) -> FileInspector<FileStore> {
    FileInspector::with_config(FileStore::new(path), config.clone())
}

/// Decode a hex byte pattern such as `"89504E47"` or `"89 50 4e 47"`.
///
/// Whitespace between digits is ignored. Empty and malformed input is rejected
/// before any file is touched.
pub fn parse_hex_pattern(input: &str) -> Result<Vec<u8>> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        bail!("Hex pattern must not be empty");
    }
    hex::decode(&compact).with_context(|| format!("Invalid hex pattern '{input}'"))
}

/// Parse an offset given in decimal or with a `0x` prefix.
pub fn parse_offset(input: &str) -> Result<u64> {
    let trimmed = input.trim();
    let parsed = match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        Some(hex_digits) => u64::from_str_radix(hex_digits, 16),
        None => trimmed.parse::<u64>(),
    };
    parsed.map_err(|e| anyhow!("Invalid offset '{input}': {e}"))
}

/// Initialize `env_logger`: `warn` by default, `-v` for info, `-vv` for debug.
///
/// `RUST_LOG` takes precedence when set.
pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}
