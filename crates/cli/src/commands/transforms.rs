use std::fs;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use bytelens_core::config::InspectConfig;
use bytelens_core::model::ComparisonReason;
use bytelens_core::store::{ByteStore, FileStore};
use bytelens_core::transform::ByteTransform;

use crate::{open_inspector, parse_hex_pattern};

/// Compare two files byte for byte.
pub fn compare_command(
    path_a: &str,
    path_b: &str,
    config: &InspectConfig,
    json: bool,
) -> Result<()> {
    let inspector = open_inspector(path_a, config);
    let result = inspector
        .compare_with(&FileStore::new(path_b))
        .with_context(|| format!("Failed to compare {path_a} with {path_b}"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    match &result.reason {
        ComparisonReason::OtherMissing => println!("File not found: {path_b}"),
        ComparisonReason::Identical => {
            println!("Files are identical ({} bytes checked)", result.total_checked)
        }
        reason => println!("Files differ: {reason}"),
    }
    for diff in &result.differences {
        println!("  0x{:08X}: {:02X} != {:02X}", diff.offset, diff.byte_a, diff.byte_b);
    }
    if result.differences.len() >= config.max_differences && !result.equal {
        println!("  (showing first {} differences)", config.max_differences);
    }
    Ok(())
}

/// XOR the file against a repeating hex key.
pub fn xor_command(
    path: &str,
    config: &InspectConfig,
    key_hex: &str,
    output: &Path,
) -> Result<()> {
    let key = parse_hex_pattern(key_hex).context("Invalid XOR key")?;
    let transform = ByteTransform::xor(key)?;
    run_transform(path, config, &transform, output)
}

/// Add `amount` to every byte, modulo 256.
pub fn shift_command(
    path: &str,
    config: &InspectConfig,
    amount: i64,
    output: &Path,
) -> Result<()> {
    run_transform(path, config, &ByteTransform::shift(amount), output)
}

/// Flip every bit.
pub fn invert_command(path: &str, config: &InspectConfig, output: &Path) -> Result<()> {
    run_transform(path, config, &ByteTransform::Invert, output)
}

fn run_transform(
    path: &str,
    config: &InspectConfig,
    transform: &ByteTransform,
    output: &Path,
) -> Result<()> {
    let inspector = open_inspector(path, config);
    // No output file is created for a missing input.
    if !inspector.store().exists() {
        anyhow::bail!("File not found: {path}");
    }
    let file = fs::File::create(output)
        .with_context(|| format!("Failed to create output file: {}", output.display()))?;
    let mut sink = BufWriter::new(file);
    let written = inspector
        .transform(transform, &mut sink)
        .with_context(|| format!("Failed to transform {path}"))?;
    println!("Wrote {written} bytes to {}", output.display());
    Ok(())
}
