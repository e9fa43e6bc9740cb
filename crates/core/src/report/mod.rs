//! Plain-text analysis report.
//!
//! Field order and rounding (4 decimals for entropy, 2 for percentages) are
//! stable; the exact wording is for humans.

use std::io::Write;

use crate::config::InspectConfig;
use crate::error::{InspectError, InspectResult};
use crate::services::inspector::FileInspector;
use crate::store::ByteStore;

/// Composes signature, structure and pattern results into a text report.
#[derive(Debug, Clone)]
pub struct Reporter {
    max_patterns: usize,
}

impl Default for Reporter {
    fn default() -> Self {
        Self { max_patterns: 10 }
    }
}

impl Reporter {
    pub fn new(max_patterns: usize) -> Self {
        Self { max_patterns }
    }

    pub fn from_config(config: &InspectConfig) -> Self {
        Self::new(config.report_patterns)
    }

    /// Write the report for `inspector`'s file into `sink`.
    ///
    /// When the file is missing only the header and one error line are written.
    pub fn write_report<S: ByteStore, W: Write>(
        &self,
        inspector: &FileInspector<S>,
        sink: &mut W,
    ) -> InspectResult<()> {
        writeln!(sink, "=== Binary File Analysis ===")?;
        writeln!(sink, "File: {}", inspector.store().label())?;
        writeln!(sink)?;

        let analysis = match inspector.analyze_structure() {
            Ok(analysis) => analysis,
            Err(InspectError::NotFound(_)) => {
                writeln!(sink, "Error: File not found")?;
                return Ok(());
            }
            Err(err) => return Err(err),
        };
        let patterns = inspector.find_patterns()?;

        writeln!(sink, "File type: {}", analysis.file_type.as_deref().unwrap_or("Unknown"))?;
        writeln!(sink, "Size: {} bytes", analysis.size)?;
        writeln!(sink, "Unique bytes: {}/256", analysis.unique_bytes)?;
        writeln!(sink, "Entropy: {:.4}", analysis.entropy)?;
        writeln!(
            sink,
            "Null bytes: {} ({:.2}%)",
            analysis.null_bytes, analysis.null_percentage
        )?;
        writeln!(sink)?;

        writeln!(sink, "=== Most Frequent Bytes ===")?;
        for item in &analysis.most_common_bytes {
            writeln!(
                sink,
                "  {} ({}) '{}': {} times ({:.2}%)",
                item.byte, item.decimal, item.ascii, item.count, item.percentage
            )?;
        }

        if !patterns.is_empty() {
            writeln!(sink)?;
            writeln!(sink, "=== Repeated Patterns ===")?;
            for pattern in patterns.iter().take(self.max_patterns) {
                writeln!(
                    sink,
                    "  Pattern {} (length {}): {} times, starting at offset {}",
                    pattern.hex(),
                    pattern.len(),
                    pattern.count(),
                    pattern.first_offset().unwrap_or_default()
                )?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn missing_file_writes_single_error_line() {
        let inspector = FileInspector::new(MemoryStore::missing("nope.bin"));
        let report = inspector.render_report().unwrap();
        assert_eq!(
            report,
            "=== Binary File Analysis ===\nFile: nope.bin\n\nError: File not found\n"
        );
    }

    #[test]
    fn report_lists_fields_in_order() {
        let inspector =
            FileInspector::new(MemoryStore::new("aaab.txt", b"AAAABAAAABAAAAB".to_vec()));
        let report = inspector.render_report().unwrap();
        let positions: Vec<usize> = [
            "File type: Text File",
            "Size: 15 bytes",
            "Unique bytes: 2/256",
            "Entropy: 0.7219",
            "Null bytes: 0 (0.00%)",
            "=== Most Frequent Bytes ===",
            "  0x41 (65) 'A': 12 times (80.00%)",
            "  0x42 (66) 'B': 3 times (20.00%)",
            "=== Repeated Patterns ===",
        ]
        .iter()
        .map(|needle| report.find(needle).unwrap_or_else(|| panic!("missing {needle:?}")))
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "fields out of order:\n{report}");
    }

    #[test]
    fn report_caps_listed_patterns() {
        let data: Vec<u8> = (0..4u8).flat_map(|round| (0..40u8).map(move |b| b ^ round)).collect();
        let inspector = FileInspector::new(MemoryStore::new("mixed", data));
        let report = inspector.render_report().unwrap();
        let listed = report.lines().filter(|l| l.trim_start().starts_with("Pattern ")).count();
        assert!(listed <= 10);
    }
}
