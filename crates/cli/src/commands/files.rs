use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use bytelens_core::config::InspectConfig;

use crate::open_inspector;

/// Print size, signature bytes, checksums and modification time.
pub fn info_command(path: &str, config: &InspectConfig, json: bool) -> Result<()> {
    let inspector = open_inspector(path, config);
    let info = inspector.file_info().with_context(|| format!("Failed to read info for {path}"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("File info:");
    println!("  Path: {}", info.path);
    println!("  Size: {} ({} bytes)", info.size_formatted, info.size);
    println!("  Signature: {}", info.signature);
    println!("  MD5: {}", info.checksums.md5);
    println!("  SHA-1: {}", info.checksums.sha1);
    println!("  SHA-256: {}", info.checksums.sha256);
    if let Some(modified) = &info.modified {
        println!("  Modified: {modified}");
    }
    Ok(())
}

/// Write the text report to `output`, or to stdout when none is given.
pub fn report_command(path: &str, config: &InspectConfig, output: Option<&Path>) -> Result<()> {
    let inspector = open_inspector(path, config);
    match output {
        Some(out) => {
            let mut file = fs::File::create(out)
                .with_context(|| format!("Failed to create report file: {}", out.display()))?;
            inspector
                .write_report(&mut file)
                .with_context(|| format!("Failed to write report to {}", out.display()))?;
            println!("Report written to {}", out.display());
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            inspector.write_report(&mut handle).context("Failed to write report")?;
            handle.flush()?;
        }
    }
    Ok(())
}
