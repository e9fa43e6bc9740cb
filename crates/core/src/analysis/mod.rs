//! Analysis of raw file contents.
//!
//! - `signature`: magic-byte detection plus a text heuristic.
//! - `structure`: byte-frequency statistics and entropy.
//! - `patterns`: repeated byte sequence enumeration.
//!
//! Every component is a pure function of its input bytes; none of them perform
//! I/O or keep state between calls.

pub mod patterns;
pub mod signature;
pub mod structure;

pub use patterns::{find_patterns, PatternFinder};
pub use signature::{SignatureMatcher, SignatureRule, SIGNATURES, TEXT_FILE, UNKNOWN_BINARY_FILE};
pub use structure::{shannon_entropy, StructureAnalyzer};
