//! Core data model for byte-level inspection results.
//!
//! Everything here is transient: values are computed on demand from a
//! [`ByteStore`](crate::store::ByteStore) and never cached across calls.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Occurrence count for each of the 256 byte values.
///
/// All 256 keys are always present; a value that never occurs has count `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteFrequencyTable {
    counts: [u64; 256],
}

impl ByteFrequencyTable {
    /// Count every byte in `data`.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut counts = [0u64; 256];
        for &byte in data {
            counts[byte as usize] += 1;
        }
        Self { counts }
    }

    pub fn count(&self, byte: u8) -> u64 {
        self.counts[byte as usize]
    }

    /// Sum of all counts, i.e. the number of bytes that were tallied.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Number of distinct byte values with a non-zero count.
    pub fn unique(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// `(byte, count)` pairs in ascending byte order, zero counts included.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts.iter().enumerate().map(|(byte, &count)| (byte as u8, count))
    }
}

/// Printable-ASCII rendering of a byte: itself for `0x20..=0x7E`, `.` otherwise.
pub fn printable_ascii(byte: u8) -> char {
    if (32..=126).contains(&byte) {
        byte as char
    } else {
        '.'
    }
}

/// `count / total * 100`, or `0.0` when `total` is zero.
pub fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// One entry of the most-frequent-bytes list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequentByte {
    /// Hex form, e.g. `0x4E`.
    pub byte: String,
    pub decimal: u8,
    pub ascii: char,
    pub count: u64,
    pub percentage: f64,
}

impl FrequentByte {
    pub fn new(byte: u8, count: u64, total: u64) -> Self {
        Self {
            byte: format!("0x{byte:02X}"),
            decimal: byte,
            ascii: printable_ascii(byte),
            count,
            percentage: percentage(count, total),
        }
    }
}

/// Statistical structure of a file's contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureReport {
    /// Detected type label; filled in by the inspector, not the analyzer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    pub size: u64,
    pub total_bytes: u64,
    pub unique_bytes: usize,
    /// Shannon entropy in bits per byte, within `[0, 8]`.
    pub entropy: f64,
    pub most_common_bytes: Vec<FrequentByte>,
    pub null_bytes: u64,
    pub null_percentage: f64,
}

/// A repeated, non-uniform byte sequence and where it occurs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternRecord {
    pub pattern: Vec<u8>,
    /// Retained start offsets in ascending order (capped per pattern).
    pub offsets: Vec<u64>,
}

impl PatternRecord {
    /// Number of offsets shown in summaries.
    pub const PREVIEW_OFFSETS: usize = 10;

    pub fn hex(&self) -> String {
        hex::encode(&self.pattern)
    }

    pub fn len(&self) -> usize {
        self.pattern.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }

    /// Occurrence count; reflects the retained (capped) offsets only.
    pub fn count(&self) -> usize {
        self.offsets.len()
    }

    pub fn first_offset(&self) -> Option<u64> {
        self.offsets.first().copied()
    }

    pub fn preview_offsets(&self) -> &[u64] {
        &self.offsets[..self.offsets.len().min(Self::PREVIEW_OFFSETS)]
    }

    pub fn summary(&self) -> PatternSummary {
        PatternSummary {
            pattern: self.hex(),
            length: self.len(),
            count: self.count(),
            first_offset: self.first_offset().unwrap_or_default(),
            offsets: self.preview_offsets().to_vec(),
        }
    }
}

/// Serializable view of a [`PatternRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSummary {
    pub pattern: String,
    pub length: usize,
    pub count: usize,
    pub first_offset: u64,
    pub offsets: Vec<u64>,
}

/// One row of a hex dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexLine {
    pub offset: u64,
    /// Exactly `bytes_per_line` cells; `None` marks a blank cell past the data.
    pub cells: Vec<Option<u8>>,
    /// Printable rendering of the bytes present (no padding).
    pub ascii: String,
}

impl fmt::Display for HexLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::with_capacity(self.cells.len() + 1);
        for (idx, cell) in self.cells.iter().enumerate() {
            parts.push(match cell {
                Some(byte) => format!("{byte:02X}"),
                None => "  ".to_string(),
            });
            // Visual half-line break.
            if idx == 7 {
                parts.push(" ".to_string());
            }
        }
        write!(f, "{:08X}  {}  |{}|", self.offset, parts.join(" "), self.ascii)
    }
}

/// A rendered line inside a search context window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextLine {
    pub offset: u64,
    pub highlighted: bool,
    pub text: String,
}

impl ContextLine {
    pub const HIGHLIGHT_PREFIX: &'static str = ">>> ";
    pub const PLAIN_PREFIX: &'static str = "    ";
}

impl fmt::Display for ContextLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix =
            if self.highlighted { Self::HIGHLIGHT_PREFIX } else { Self::PLAIN_PREFIX };
        write!(f, "{prefix}{}", self.text)
    }
}

/// Hex dump around one match of a searched pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchContext {
    pub offset: u64,
    pub lines: Vec<ContextLine>,
}

/// One page of a paged hex dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexPage {
    /// Offset of the first line on the page.
    pub offset: u64,
    pub lines: Vec<String>,
}

/// A single mismatching byte between two files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difference {
    pub offset: u64,
    pub byte_a: u8,
    pub byte_b: u8,
}

/// Why a comparison came out the way it did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComparisonReason {
    Identical,
    Different,
    SizeMismatch { size_a: u64, size_b: u64 },
    OtherMissing,
}

impl fmt::Display for ComparisonReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonReason::Identical => f.write_str("files are identical"),
            ComparisonReason::Different => f.write_str("contents differ"),
            ComparisonReason::SizeMismatch { size_a, size_b } => {
                write!(f, "different sizes ({size_a} vs {size_b} bytes)")
            }
            ComparisonReason::OtherMissing => f.write_str("second file does not exist"),
        }
    }
}

/// Outcome of a byte-for-byte comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub equal: bool,
    pub reason: ComparisonReason,
    /// Mismatches in offset order, capped.
    pub differences: Vec<Difference>,
    pub total_checked: u64,
}

/// Digests of a file's contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checksums {
    pub md5: String,
    pub sha1: String,
    pub sha256: String,
}

/// Summary information about a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub path: String,
    pub size: u64,
    pub size_formatted: String,
    /// Leading bytes as space-separated uppercase hex.
    pub signature: String,
    pub checksums: Checksums,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
}

/// Human-readable size with a 1024 divisor, e.g. `1.50 KB`.
pub fn format_size(size: u64) -> String {
    let mut value = size as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if value < 1024.0 {
            return format!("{value:.2} {unit}");
        }
        value /= 1024.0;
    }
    format!("{value:.2} TB")
}
