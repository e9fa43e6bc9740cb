//! Repeated fixed-length byte sequence detection.
//!
//! The scan is `O(len × window)`: every start offset is visited once per
//! candidate length. It is meant for small files; callers decide whether the
//! cost is acceptable for larger inputs.

use std::collections::HashMap;

use crate::config::InspectConfig;
use crate::model::PatternRecord;

/// Enumerates repeated, non-uniform byte windows over a range of lengths.
#[derive(Debug, Clone)]
pub struct PatternFinder {
    pub min_length: usize,
    /// Lengths scanned are `min_length .. min_length + length_window`.
    pub length_window: usize,
    pub max_patterns: usize,
    pub max_offsets_per_pattern: usize,
}

impl Default for PatternFinder {
    fn default() -> Self {
        Self { min_length: 4, length_window: 4, max_patterns: 20, max_offsets_per_pattern: 100 }
    }
}

impl PatternFinder {
    pub fn new(min_length: usize, max_patterns: usize) -> Self {
        Self { min_length, max_patterns, ..Self::default() }
    }

    pub fn from_config(config: &InspectConfig) -> Self {
        Self {
            min_length: config.min_pattern_length,
            length_window: config.pattern_length_window,
            max_patterns: config.max_patterns,
            max_offsets_per_pattern: config.max_offsets_per_pattern,
        }
    }

    /// Repeated patterns in `contents`, most frequent first.
    ///
    /// Counts reflect only retained offsets, so a pattern that occurs more than
    /// `max_offsets_per_pattern` times ranks as if it occurred exactly that often.
    pub fn find(&self, contents: &[u8]) -> Vec<PatternRecord> {
        if self.min_length == 0 || contents.len() < self.min_length.saturating_mul(2) {
            return Vec::new();
        }

        let upper = self.min_length.saturating_add(self.length_window).min(contents.len() / 2);

        // Insertion-ordered: `index` maps pattern bytes to a slot in `found`.
        let mut index: HashMap<&[u8], usize> = HashMap::new();
        let mut found: Vec<(&[u8], Vec<u64>)> = Vec::new();

        for length in self.min_length..upper {
            for (start, window) in contents.windows(length).enumerate() {
                if is_uniform(window) {
                    continue;
                }
                let slot = *index.entry(window).or_insert_with(|| {
                    found.push((window, Vec::new()));
                    found.len() - 1
                });
                let offsets = &mut found[slot].1;
                if offsets.len() < self.max_offsets_per_pattern {
                    offsets.push(start as u64);
                }
            }
        }

        let mut repeated: Vec<PatternRecord> = found
            .into_iter()
            .filter(|(_, offsets)| offsets.len() > 1)
            .map(|(pattern, offsets)| PatternRecord { pattern: pattern.to_vec(), offsets })
            .collect();

        log::debug!(
            "pattern scan over {} bytes (lengths {}..{}) kept {} repeated patterns",
            contents.len(),
            self.min_length,
            upper,
            repeated.len()
        );

        repeated.sort_by(|a, b| b.count().cmp(&a.count()));
        repeated.truncate(self.max_patterns);
        repeated
    }
}

/// Convenience wrapper using default caps for everything but the two main knobs.
pub fn find_patterns(
    contents: &[u8],
    min_length: usize,
    max_patterns: usize,
) -> Vec<PatternRecord> {
    PatternFinder::new(min_length, max_patterns).find(contents)
}

fn is_uniform(window: &[u8]) -> bool {
    match window.split_first() {
        Some((first, rest)) => rest.iter().all(|b| b == first),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_windows_are_skipped() {
        let patterns = find_patterns(b"AAAABAAAABAAAAB", 4, 20);
        assert!(patterns.iter().all(|p| p.pattern != b"AAAA"));
        let aaab = patterns.iter().find(|p| p.pattern == b"AAAB").expect("AAAB should repeat");
        assert_eq!(aaab.hex(), "41414142");
        assert_eq!(aaab.offsets, vec![1, 6, 11]);
        assert_eq!(aaab.count(), 3);
    }

    #[test]
    fn short_input_short_circuits() {
        assert!(find_patterns(b"abcabca", 4, 20).is_empty());
        assert!(find_patterns(b"", 4, 20).is_empty());
    }

    #[test]
    fn zero_min_length_yields_nothing() {
        assert!(find_patterns(b"abababab", 0, 20).is_empty());
    }

    #[test]
    fn offsets_are_capped_per_pattern() {
        let data = b"xy".repeat(200);
        let finder = PatternFinder { max_offsets_per_pattern: 5, ..PatternFinder::new(2, 20) };
        let patterns = finder.find(&data);
        assert!(!patterns.is_empty());
        assert!(patterns.iter().all(|p| p.count() <= 5));
        assert_eq!(patterns[0].offsets, vec![0, 2, 4, 6, 8]);
    }

    #[test]
    fn results_are_sorted_and_truncated() {
        let data = b"abcdXabcdYabcdZqrstWqrst";
        let patterns = find_patterns(data, 4, 2);
        assert_eq!(patterns.len(), 2);
        assert!(patterns[0].count() >= patterns[1].count());
        assert_eq!(patterns[0].pattern, b"abcd");
    }

    #[test]
    fn lengths_are_bounded_by_half_the_input() {
        // 10 bytes: lengths 4 only (upper bound min(8, 5) is exclusive).
        let patterns = find_patterns(b"abcdeabcde", 4, 20);
        assert!(patterns.iter().all(|p| p.len() == 4));
        assert!(patterns.iter().any(|p| p.pattern == b"abcd"));
    }
}
