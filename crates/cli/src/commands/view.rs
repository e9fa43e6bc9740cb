use anyhow::{bail, Context, Result};
use bytelens_core::config::InspectConfig;

use crate::{open_inspector, parse_hex_pattern};

/// Resolve the search pattern from exactly one of `--hex` / `--text`.
pub fn search_pattern_from_args(hex: Option<&str>, text: Option<&str>) -> Result<Vec<u8>> {
    match (hex, text) {
        (Some(h), None) => parse_hex_pattern(h),
        (None, Some(t)) if !t.is_empty() => Ok(t.as_bytes().to_vec()),
        (None, Some(_)) => bail!("Text pattern must not be empty"),
        _ => bail!("Provide exactly one of --hex or --text"),
    }
}

/// Print `lines` hex dump lines starting at `offset`.
pub fn dump_command(path: &str, config: &InspectConfig, offset: u64, lines: usize) -> Result<()> {
    let inspector = open_inspector(path, config);
    let rendered = inspector
        .view_range(offset, lines)
        .with_context(|| format!("Failed to dump {path} at offset {offset}"))?;
    for line in rendered {
        println!("{line}");
    }
    Ok(())
}

/// Print the whole file page by page; `max_pages` stops early.
pub fn pages_command(
    path: &str,
    config: &InspectConfig,
    lines_per_page: usize,
    max_pages: Option<usize>,
) -> Result<()> {
    let inspector = open_inspector(path, config);
    let pages = inspector
        .view_paged(lines_per_page)
        .with_context(|| format!("Failed to page {path}"))?;

    for (idx, page) in pages.take(max_pages.unwrap_or(usize::MAX)).enumerate() {
        let page = page.with_context(|| format!("Failed to read page {} of {path}", idx + 1))?;
        if idx > 0 {
            println!();
        }
        println!("--- Page {} (offset 0x{:08X}) ---", idx + 1, page.offset);
        for line in &page.lines {
            println!("{line}");
        }
    }
    Ok(())
}

/// Print highlighted context windows for each match of `pattern`.
pub fn search_command(
    path: &str,
    config: &InspectConfig,
    pattern: &[u8],
    context_lines: Option<usize>,
) -> Result<()> {
    let inspector = open_inspector(path, config);
    let matches = inspector
        .search_and_highlight(pattern, context_lines.unwrap_or(config.context_lines))
        .with_context(|| format!("Failed to search {path}"))?;

    if matches.is_empty() {
        println!("Pattern {} not found.", hex::encode(pattern));
        return Ok(());
    }

    println!("Found {} match(es) for {}:", matches.len(), hex::encode(pattern));
    for ctx in &matches {
        println!();
        println!("Match at offset 0x{:08X}:", ctx.offset);
        for line in &ctx.lines {
            println!("{line}");
        }
    }
    Ok(())
}
