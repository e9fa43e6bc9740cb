use anyhow::{Context, Result};
use bytelens_core::config::InspectConfig;
use bytelens_core::model::PatternSummary;

use crate::open_inspector;

/// Print the detected file type.
pub fn detect_command(path: &str, config: &InspectConfig) -> Result<()> {
    let inspector = open_inspector(path, config);
    let label = inspector
        .detect_file_type()
        .with_context(|| format!("Failed to detect file type of {path}"))?;
    println!("{path}: {label}");
    Ok(())
}

/// Print byte statistics and entropy.
pub fn analyze_command(path: &str, config: &InspectConfig, json: bool) -> Result<()> {
    let inspector = open_inspector(path, config);
    let report =
        inspector.analyze_structure().with_context(|| format!("Failed to analyze {path}"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("File: {path}");
    println!("  Type: {}", report.file_type.as_deref().unwrap_or("Unknown"));
    println!("  Size: {} bytes", report.size);
    println!("  Unique bytes: {}/256", report.unique_bytes);
    println!("  Entropy: {:.4}", report.entropy);
    println!("  Null bytes: {} ({:.2}%)", report.null_bytes, report.null_percentage);
    println!("Most frequent bytes:");
    for item in &report.most_common_bytes {
        println!(
            "  {} ({}) '{}': {} times ({:.2}%)",
            item.byte, item.decimal, item.ascii, item.count, item.percentage
        );
    }
    Ok(())
}

/// List repeated byte patterns.
pub fn patterns_command(
    path: &str,
    config: &InspectConfig,
    min_length: Option<usize>,
    max_patterns: Option<usize>,
    json: bool,
) -> Result<()> {
    let inspector = open_inspector(path, config);
    let patterns = inspector
        .find_patterns_with(
            min_length.unwrap_or(config.min_pattern_length),
            max_patterns.unwrap_or(config.max_patterns),
        )
        .with_context(|| format!("Failed to scan {path} for patterns"))?;

    if json {
        let summaries: Vec<PatternSummary> = patterns.iter().map(|p| p.summary()).collect();
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    if patterns.is_empty() {
        println!("No repeated patterns found.");
        return Ok(());
    }

    println!("Repeated patterns ({}):", patterns.len());
    for pattern in &patterns {
        let offsets: Vec<String> =
            pattern.preview_offsets().iter().map(|o| format!("0x{o:X}")).collect();
        println!(
            "  {} (length {}): {} times at [{}]",
            pattern.hex(),
            pattern.len(),
            pattern.count(),
            offsets.join(", ")
        );
    }
    Ok(())
}
