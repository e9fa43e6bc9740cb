//! File type detection from magic-byte prefixes.

use crate::config::InspectConfig;

/// Label returned when no signature matches and the sample looks like text.
pub const TEXT_FILE: &str = "Text File";

/// Label returned when nothing matches and the sample does not look like text.
pub const UNKNOWN_BINARY_FILE: &str = "Unknown Binary File";

/// A known magic-byte prefix and the type label it implies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureRule {
    pub magic: &'static [u8],
    pub label: &'static str,
}

/// Built-in signature table.
///
/// Order is match priority: the first rule whose magic is a prefix of the
/// input wins, so no rule may be a prefix of an earlier one.
pub static SIGNATURES: &[SignatureRule] = &[
    SignatureRule { magic: &[0xFF, 0xD8, 0xFF], label: "JPEG Image" },
    SignatureRule { magic: &[0x89, 0x50, 0x4E, 0x47], label: "PNG Image" },
    SignatureRule { magic: b"GIF8", label: "GIF Image" },
    SignatureRule { magic: b"BM", label: "BMP Image" },
    SignatureRule { magic: &[0x49, 0x49, 0x2A, 0x00], label: "TIFF Image (little-endian)" },
    SignatureRule { magic: &[0x4D, 0x4D, 0x00, 0x2A], label: "TIFF Image (big-endian)" },
    SignatureRule { magic: b"%PDF", label: "PDF Document" },
    SignatureRule { magic: b"PK\x03\x04", label: "ZIP Archive / DOCX / XLSX" },
    SignatureRule { magic: b"PK\x05\x06", label: "ZIP Archive (empty)" },
    SignatureRule { magic: b"PK\x07\x08", label: "ZIP Archive (spanned)" },
    SignatureRule { magic: b"Rar!\x1A\x07", label: "RAR Archive" },
    SignatureRule { magic: &[0x1F, 0x8B, 0x08], label: "GZIP Archive" },
    SignatureRule { magic: b"\x7FELF", label: "ELF Executable" },
    SignatureRule { magic: b"MZ", label: "DOS/Windows Executable" },
    SignatureRule { magic: &[0xCA, 0xFE, 0xBA, 0xBE], label: "Mach-O Binary (32-bit)" },
    SignatureRule { magic: &[0xCF, 0xFA, 0xED, 0xFE], label: "Mach-O Binary (32-bit reverse)" },
    SignatureRule { magic: &[0xFE, 0xED, 0xFA, 0xCE], label: "Mach-O Binary (32-bit)" },
    SignatureRule { magic: &[0xFE, 0xED, 0xFA, 0xCF], label: "Mach-O Binary (64-bit)" },
    SignatureRule { magic: b"{\\rtf", label: "RTF Document" },
    SignatureRule {
        magic: &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1],
        label: "Microsoft Office Document (DOC/XLS/PPT)",
    },
    SignatureRule { magic: b"ID3", label: "MP3 Audio (ID3v2)" },
    SignatureRule { magic: &[0xFF, 0xFB], label: "MP3 Audio" },
    SignatureRule { magic: b"ftyp", label: "MP4 Video (at offset 4)" },
    SignatureRule { magic: b"\x00\x00\x00\x20ftyp", label: "MP4 Video" },
    SignatureRule { magic: b"RIFF", label: "RIFF (AVI/WAV)" },
    SignatureRule { magic: b"OggS", label: "OGG Audio" },
    SignatureRule { magic: b"fLaC", label: "FLAC Audio" },
    SignatureRule {
        magic: &[0x30, 0x26, 0xB2, 0x75, 0x8E, 0x66, 0xCF, 0x11],
        label: "WMA/WMV",
    },
];

/// Control bytes that still count as text: BEL, BS, TAB, LF, FF, CR, ESC.
const TEXT_CONTROL_BYTES: [u8; 7] = [0x07, 0x08, 0x09, 0x0A, 0x0C, 0x0D, 0x1B];

/// Whether `byte` belongs to the text whitelist.
pub fn is_text_byte(byte: u8) -> bool {
    byte >= 0x20 || TEXT_CONTROL_BYTES.contains(&byte)
}

/// Classifies a byte prefix against an ordered signature table.
#[derive(Debug, Clone)]
pub struct SignatureMatcher {
    rules: &'static [SignatureRule],
    text_sample_size: usize,
    text_threshold: f64,
}

impl Default for SignatureMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl SignatureMatcher {
    /// Matcher over the built-in table with a 512-byte, 30% text heuristic.
    pub fn new() -> Self {
        Self { rules: SIGNATURES, text_sample_size: 512, text_threshold: 0.3 }
    }

    pub fn from_config(config: &InspectConfig) -> Self {
        Self {
            rules: SIGNATURES,
            text_sample_size: config.text_sample_size,
            text_threshold: config.text_threshold,
        }
    }

    /// Use a custom rule table (still matched in slice order).
    pub fn with_rules(mut self, rules: &'static [SignatureRule]) -> Self {
        self.rules = rules;
        self
    }

    pub fn rules(&self) -> &'static [SignatureRule] {
        self.rules
    }

    /// Longest magic in the table; callers should pass at least this many bytes.
    pub fn longest_magic(&self) -> usize {
        self.rules.iter().map(|r| r.magic.len()).max().unwrap_or(0)
    }

    /// First rule whose magic is a prefix of `prefix`.
    pub fn match_rule(&self, prefix: &[u8]) -> Option<&'static SignatureRule> {
        self.rules.iter().find(|rule| prefix.starts_with(rule.magic))
    }

    /// Type label for a file whose leading bytes are `prefix`.
    pub fn detect(&self, prefix: &[u8]) -> &'static str {
        if let Some(rule) = self.match_rule(prefix) {
            return rule.label;
        }
        if self.is_text(prefix) {
            TEXT_FILE
        } else {
            UNKNOWN_BINARY_FILE
        }
    }

    /// Text heuristic over the first `text_sample_size` bytes.
    ///
    /// An empty sample is never text.
    pub fn is_text(&self, data: &[u8]) -> bool {
        let sample = &data[..data.len().min(self.text_sample_size)];
        if sample.is_empty() {
            return false;
        }
        let non_text = sample.iter().filter(|&&b| !is_text_byte(b)).count();
        (non_text as f64 / sample.len() as f64) < self.text_threshold
    }
}
