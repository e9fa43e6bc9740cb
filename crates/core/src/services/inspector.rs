use std::io::Write;

use log::{debug, warn};

use crate::analysis::{PatternFinder, SignatureMatcher, StructureAnalyzer};
use crate::config::InspectConfig;
use crate::error::{InspectError, InspectResult};
use crate::hexview::{HexRenderer, Pages};
use crate::model::{
    format_size, ByteFrequencyTable, Checksums, ComparisonResult, FileInfo, MatchContext,
    PatternRecord, StructureReport,
};
use crate::report::Reporter;
use crate::store::{ByteStore, ChecksumAlgorithm};
use crate::transform::{self, ByteTransform};

/// Entry point tying a [`ByteStore`] to the analysis components.
///
/// Every operation checks that the target exists first and returns
/// [`InspectError::NotFound`] otherwise. Nothing is cached: each call re-reads
/// the store and recomputes.
#[derive(Debug, Clone)]
pub struct FileInspector<S> {
    store: S,
    config: InspectConfig,
}

impl<S: ByteStore> FileInspector<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, InspectConfig::default())
    }

    pub fn with_config(store: S, config: InspectConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &InspectConfig {
        &self.config
    }

    pub fn renderer(&self) -> HexRenderer {
        HexRenderer::from_config(&self.config)
    }

    fn ensure_exists(&self) -> InspectResult<()> {
        if self.store.exists() {
            Ok(())
        } else {
            let label = self.store.label();
            warn!("File not found: {label}");
            Err(InspectError::NotFound(label))
        }
    }

    /// Type label from the leading signature bytes.
    pub fn detect_file_type(&self) -> InspectResult<&'static str> {
        self.ensure_exists()?;
        let prefix = self.store.read(0, self.config.signature_len)?;
        let label = SignatureMatcher::from_config(&self.config).detect(&prefix);
        debug!("{}: detected '{label}' from {} prefix bytes", self.store.label(), prefix.len());
        Ok(label)
    }

    /// Fresh frequency table over the whole file.
    pub fn byte_frequency(&self) -> InspectResult<ByteFrequencyTable> {
        self.ensure_exists()?;
        Ok(ByteFrequencyTable::from_bytes(&self.store.read_all()?))
    }

    /// Structure report including file type and on-disk size.
    pub fn analyze_structure(&self) -> InspectResult<StructureReport> {
        let table = self.byte_frequency()?;
        let mut report = StructureAnalyzer::from_config(&self.config).analyze_table(&table);
        report.size = self.store.size()?;
        report.file_type = Some(self.detect_file_type()?.to_string());
        debug!(
            "{}: {} bytes, {} unique, entropy {:.4}",
            self.store.label(),
            report.total_bytes,
            report.unique_bytes,
            report.entropy
        );
        Ok(report)
    }

    /// Repeated patterns using the configured length and count limits.
    pub fn find_patterns(&self) -> InspectResult<Vec<PatternRecord>> {
        self.run_pattern_finder(PatternFinder::from_config(&self.config))
    }

    /// Repeated patterns with explicit `min_length` / `max_patterns`.
    pub fn find_patterns_with(
        &self,
        min_length: usize,
        max_patterns: usize,
    ) -> InspectResult<Vec<PatternRecord>> {
        let finder =
            PatternFinder { min_length, max_patterns, ..PatternFinder::from_config(&self.config) };
        self.run_pattern_finder(finder)
    }

    fn run_pattern_finder(&self, finder: PatternFinder) -> InspectResult<Vec<PatternRecord>> {
        self.ensure_exists()?;
        let data = self.store.read_all()?;
        Ok(finder.find(&data))
    }

    pub fn view_range(&self, start_offset: u64, lines: usize) -> InspectResult<Vec<String>> {
        self.ensure_exists()?;
        Ok(self.renderer().view_range(&self.store, start_offset, lines)?)
    }

    /// Lazily paged hex dump of the whole file.
    pub fn view_paged(&self, lines_per_page: usize) -> InspectResult<Pages<'_>> {
        self.ensure_exists()?;
        Ok(self.renderer().view_paged(&self.store, lines_per_page)?)
    }

    /// Highlighted context windows around each match of `pattern`.
    pub fn search_and_highlight(
        &self,
        pattern: &[u8],
        context_lines: usize,
    ) -> InspectResult<Vec<MatchContext>> {
        self.ensure_exists()?;
        let matches = self.renderer().search_and_highlight(
            &self.store,
            pattern,
            context_lines,
            self.config.search_max_results,
        )?;
        debug!("{}: {} match(es) for {}", self.store.label(), matches.len(), hex::encode(pattern));
        Ok(matches)
    }

    /// Size, signature bytes, checksums and modification time.
    pub fn file_info(&self) -> InspectResult<FileInfo> {
        self.ensure_exists()?;
        let size = self.store.size()?;
        let signature = self.store.read(0, self.config.signature_len)?;
        Ok(FileInfo {
            path: self.store.label(),
            size,
            size_formatted: format_size(size),
            signature: signature.iter().map(|b| format!("{b:02X}")).collect::<Vec<_>>().join(" "),
            checksums: Checksums {
                md5: self.store.checksum(ChecksumAlgorithm::Md5)?,
                sha1: self.store.checksum(ChecksumAlgorithm::Sha1)?,
                sha256: self.store.checksum(ChecksumAlgorithm::Sha256)?,
            },
            modified: self.store.modified().map(|t| t.to_rfc3339()),
        })
    }

    /// Byte-for-byte comparison against `other`.
    pub fn compare_with<O: ByteStore + ?Sized>(
        &self,
        other: &O,
    ) -> InspectResult<ComparisonResult> {
        self.ensure_exists()?;
        transform::compare(&self.store, other, self.config.chunk_size, self.config.max_differences)
    }

    /// Stream the transformed contents into `sink`; returns bytes written.
    pub fn transform<W: Write>(
        &self,
        transform: &ByteTransform,
        sink: &mut W,
    ) -> InspectResult<u64> {
        self.ensure_exists()?;
        transform::apply(&self.store, transform, sink, self.config.chunk_size)
    }

    /// Human-readable analysis report.
    ///
    /// A missing file is not an error here: the report contains a single error
    /// line instead.
    pub fn write_report<W: Write>(&self, sink: &mut W) -> InspectResult<()> {
        Reporter::from_config(&self.config).write_report(self, sink)
    }

    pub fn render_report(&self) -> InspectResult<String> {
        let mut buf = Vec::new();
        self.write_report(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn every_entry_point_checks_existence() {
        let inspector = FileInspector::new(MemoryStore::missing("gone.bin"));
        assert!(inspector.detect_file_type().unwrap_err().is_not_found());
        assert!(inspector.analyze_structure().unwrap_err().is_not_found());
        assert!(inspector.find_patterns().unwrap_err().is_not_found());
        assert!(inspector.view_range(0, 1).unwrap_err().is_not_found());
        assert!(inspector.search_and_highlight(b"x", 2).unwrap_err().is_not_found());
        assert!(inspector.file_info().unwrap_err().is_not_found());
        assert!(inspector.view_paged(4).is_err());
    }

    #[test]
    fn structure_report_carries_type_and_size() {
        let inspector =
            FileInspector::new(MemoryStore::new("png", vec![0x89, 0x50, 0x4E, 0x47, 0, 0, 0, 0]));
        let report = inspector.analyze_structure().unwrap();
        assert_eq!(report.file_type.as_deref(), Some("PNG Image"));
        assert_eq!(report.size, 8);
        assert_eq!(report.unique_bytes, 5);
        assert_eq!(report.null_bytes, 4);
    }

    #[test]
    fn file_info_formats_signature() {
        let inspector = FileInspector::new(MemoryStore::new("abc", b"abc".to_vec()));
        let info = inspector.file_info().unwrap();
        assert_eq!(info.signature, "61 62 63");
        assert_eq!(info.size_formatted, "3.00 B");
        assert_eq!(info.checksums.md5, "900150983cd24fb0d6963f7d28e17f72");
        assert_eq!(info.checksums.sha1, "a9993e364706816aba3e25717850c26c9cd0d89d");
        assert!(info.modified.is_none());
    }
}
