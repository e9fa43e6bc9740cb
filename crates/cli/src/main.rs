use std::path::PathBuf;

use anyhow::Result;
use bytelens::commands::*;
use bytelens::{init_logging, load_config_or_default, parse_offset};
use clap::{ArgGroup, Parser, Subcommand};

/// Byte-level file inspection.
///
/// This CLI is a thin wrapper around `bytelens-core`. All substantive logic
/// lives in the library so it can be tested thoroughly and reused from other
/// frontends.
#[derive(Parser, Debug)]
#[command(name = "bytelens", version, about = "Byte-level file inspection", long_about = None)]
struct Cli {
    /// Config file (.json, .yaml/.yml, or key = value lines).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the number of bytes rendered per hex line.
    #[arg(long, global = true)]
    bytes_per_line: Option<usize>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Detect the file type from its signature bytes.
    Detect {
        path: String,
    },

    /// Byte frequency statistics and Shannon entropy.
    Analyze {
        path: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Find repeated, non-uniform byte sequences.
    Patterns {
        path: String,

        /// Shortest pattern length to scan for.
        #[arg(long)]
        min_length: Option<usize>,

        /// Maximum number of patterns to list.
        #[arg(long)]
        max_patterns: Option<usize>,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Hex dump a range of lines.
    Dump {
        path: String,

        /// Start offset, decimal or 0x-prefixed hex.
        #[arg(long, default_value = "0", value_parser = offset_arg)]
        offset: u64,

        /// Number of lines to render.
        #[arg(long, default_value_t = 16)]
        lines: usize,
    },

    /// Hex dump the whole file, page by page.
    Pages {
        path: String,

        #[arg(long, default_value_t = 16)]
        lines_per_page: usize,

        /// Stop after this many pages.
        #[arg(long)]
        max_pages: Option<usize>,
    },

    /// Search for a byte pattern and show highlighted context.
    #[command(group(ArgGroup::new("pattern").required(true).args(["hex", "text"])))]
    Search {
        path: String,

        /// Pattern as hex digits, e.g. `89504E47` or `"89 50 4E 47"`.
        #[arg(long)]
        hex: Option<String>,

        /// Pattern as literal text.
        #[arg(long)]
        text: Option<String>,

        /// Lines of context before and after each match.
        #[arg(long)]
        context: Option<usize>,
    },

    /// Size, signature bytes, checksums and modification time.
    Info {
        path: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Full text report (type, statistics, frequent bytes, patterns).
    Report {
        path: String,

        /// Write the report here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Compare two files byte for byte.
    Compare {
        first: String,
        second: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// XOR the file with a repeating key.
    Xor {
        path: String,

        /// Key as hex digits.
        #[arg(long)]
        key: String,

        #[arg(long)]
        output: PathBuf,
    },

    /// Add a constant to every byte (mod 256).
    Shift {
        path: String,

        #[arg(long, allow_hyphen_values = true)]
        amount: i64,

        #[arg(long)]
        output: PathBuf,
    },

    /// Bitwise NOT of every byte.
    Invert {
        path: String,

        #[arg(long)]
        output: PathBuf,
    },
}

fn offset_arg(value: &str) -> Result<u64, String> {
    parse_offset(value).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = load_config_or_default(cli.config.as_deref())?;
    if let Some(bpl) = cli.bytes_per_line {
        config.bytes_per_line = bpl;
        config.validate()?;
    }

    match cli.command {
        Command::Detect { path } => detect_command(&path, &config)?,
        Command::Analyze { path, json } => analyze_command(&path, &config, json)?,
        Command::Patterns { path, min_length, max_patterns, json } => {
            patterns_command(&path, &config, min_length, max_patterns, json)?
        }
        Command::Dump { path, offset, lines } => dump_command(&path, &config, offset, lines)?,
        Command::Pages { path, lines_per_page, max_pages } => {
            pages_command(&path, &config, lines_per_page, max_pages)?
        }
        Command::Search { path, hex, text, context } => {
            let pattern = search_pattern_from_args(hex.as_deref(), text.as_deref())?;
            search_command(&path, &config, &pattern, context)?
        }
        Command::Info { path, json } => info_command(&path, &config, json)?,
        Command::Report { path, output } => report_command(&path, &config, output.as_deref())?,
        Command::Compare { first, second, json } => {
            compare_command(&first, &second, &config, json)?
        }
        Command::Xor { path, key, output } => xor_command(&path, &config, &key, &output)?,
        Command::Shift { path, amount, output } => {
            shift_command(&path, &config, amount, &output)?
        }
        Command::Invert { path, output } => invert_command(&path, &config, &output)?,
    }

    Ok(())
}
