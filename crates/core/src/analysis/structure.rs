//! Byte-frequency statistics and Shannon entropy.

use crate::config::InspectConfig;
use crate::model::{percentage, ByteFrequencyTable, FrequentByte, StructureReport};

/// Shannon entropy of the distribution in `table`, in bits per byte.
///
/// Only values with non-zero probability contribute. An empty table has
/// entropy `0.0`.
pub fn shannon_entropy(table: &ByteFrequencyTable) -> f64 {
    let total = table.total();
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    let entropy = table
        .iter()
        .filter(|&(_, count)| count > 0)
        .map(|(_, count)| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum::<f64>();
    // A single-valued distribution sums to -0.0.
    entropy.max(0.0)
}

/// Computes a [`StructureReport`] from file contents.
#[derive(Debug, Clone)]
pub struct StructureAnalyzer {
    top_n: usize,
}

impl Default for StructureAnalyzer {
    fn default() -> Self {
        Self { top_n: 10 }
    }
}

impl StructureAnalyzer {
    pub fn new(top_n: usize) -> Self {
        Self { top_n }
    }

    pub fn from_config(config: &InspectConfig) -> Self {
        Self::new(config.top_bytes)
    }

    /// Build a fresh frequency table from `contents` and analyze it.
    pub fn analyze(&self, contents: &[u8]) -> StructureReport {
        self.analyze_table(&ByteFrequencyTable::from_bytes(contents))
    }

    /// Analyze an already-built frequency table.
    ///
    /// `size` is set to the tallied byte count and `file_type` is left empty;
    /// the inspector fills both from the store.
    pub fn analyze_table(&self, table: &ByteFrequencyTable) -> StructureReport {
        let total = table.total();
        StructureReport {
            file_type: None,
            size: total,
            total_bytes: total,
            unique_bytes: table.unique(),
            entropy: shannon_entropy(table),
            most_common_bytes: self.most_common(table),
            null_bytes: table.count(0),
            null_percentage: percentage(table.count(0), total),
        }
    }

    /// Top entries by descending count. Ties keep ascending byte order.
    pub fn most_common(&self, table: &ByteFrequencyTable) -> Vec<FrequentByte> {
        let total = table.total();
        let mut present: Vec<(u8, u64)> = table.iter().filter(|&(_, count)| count > 0).collect();
        // `sort_by` is stable, which is what keeps the tie order.
        present.sort_by(|a, b| b.1.cmp(&a.1));
        present
            .into_iter()
            .take(self.top_n)
            .map(|(byte, count)| FrequentByte::new(byte, count, total))
            .collect()
    }
}
