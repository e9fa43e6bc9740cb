//! Hex dump rendering: single lines, ranges, pages, and search contexts.
//!
//! Line layout (16 bytes per line):
//!
//! ```text
//! 00000000  89 50 4E 47 0D 0A 1A 0A   00 00 00 0D 49 48 44 52  |.PNG........IHDR|
//! ```

use crate::config::InspectConfig;
use crate::model::{printable_ascii, ContextLine, HexLine, HexPage, MatchContext};
use crate::store::{ByteStore, ChunkIter, StoreResult};

/// Formats byte chunks into fixed-width offset / hex / ASCII lines.
#[derive(Debug, Clone)]
pub struct HexRenderer {
    bytes_per_line: usize,
}

impl Default for HexRenderer {
    fn default() -> Self {
        Self { bytes_per_line: 16 }
    }
}

impl HexRenderer {
    /// `bytes_per_line` of zero is bumped to one.
    pub fn new(bytes_per_line: usize) -> Self {
        Self { bytes_per_line: bytes_per_line.max(1) }
    }

    pub fn from_config(config: &InspectConfig) -> Self {
        Self::new(config.bytes_per_line)
    }

    pub fn bytes_per_line(&self) -> usize {
        self.bytes_per_line
    }

    /// Structured line for `chunk`; bytes beyond `bytes_per_line` are ignored.
    pub fn hex_line(&self, offset: u64, chunk: &[u8]) -> HexLine {
        let chunk = &chunk[..chunk.len().min(self.bytes_per_line)];
        let cells = (0..self.bytes_per_line).map(|i| chunk.get(i).copied()).collect();
        let ascii = chunk.iter().copied().map(printable_ascii).collect();
        HexLine { offset, cells, ascii }
    }

    pub fn format_line(&self, offset: u64, chunk: &[u8]) -> String {
        self.hex_line(offset, chunk).to_string()
    }

    fn render_lines(&self, start_offset: u64, data: &[u8]) -> Vec<String> {
        data.chunks(self.bytes_per_line)
            .enumerate()
            .map(|(idx, chunk)| {
                self.format_line(start_offset + (idx * self.bytes_per_line) as u64, chunk)
            })
            .collect()
    }

    /// `lines` lines starting at `start_offset`; fewer when the file ends first.
    pub fn view_range<S: ByteStore + ?Sized>(
        &self,
        store: &S,
        start_offset: u64,
        lines: usize,
    ) -> StoreResult<Vec<String>> {
        let data = store.read(start_offset, lines.saturating_mul(self.bytes_per_line))?;
        Ok(self.render_lines(start_offset, &data))
    }

    /// Lazily page through the whole store using sequential chunk reads.
    pub fn view_paged<'a, S: ByteStore + ?Sized>(
        &self,
        store: &'a S,
        lines_per_page: usize,
    ) -> StoreResult<Pages<'a>> {
        Ok(Pages {
            renderer: self.clone(),
            chunks: store.read_chunks(self.bytes_per_line)?,
            lines_per_page: lines_per_page.max(1),
            done: false,
        })
    }

    /// Context windows around up to `max_results` occurrences of `pattern`.
    ///
    /// Each window covers `context_lines` lines before and after the line holding
    /// the match (clamped at the start of the file). Lines that overlap the
    /// matched bytes are highlighted.
    pub fn search_and_highlight<S: ByteStore + ?Sized>(
        &self,
        store: &S,
        pattern: &[u8],
        context_lines: usize,
        max_results: usize,
    ) -> StoreResult<Vec<MatchContext>> {
        let bpl = self.bytes_per_line as u64;
        let offsets = store.find(pattern, Some(max_results))?;
        let mut results = Vec::with_capacity(offsets.len());

        for offset in offsets {
            let match_line = offset / bpl * bpl;
            let start = match_line.saturating_sub(context_lines as u64 * bpl);
            let span_lines = context_lines.saturating_mul(2).saturating_add(1);
            let data = store.read(start, span_lines.saturating_mul(self.bytes_per_line))?;
            let match_end = offset + pattern.len() as u64;

            let lines = data
                .chunks(self.bytes_per_line)
                .enumerate()
                .map(|(idx, chunk)| {
                    let line_offset = start + idx as u64 * bpl;
                    ContextLine {
                        offset: line_offset,
                        highlighted: line_offset < match_end && offset < line_offset + bpl,
                        text: self.format_line(line_offset, chunk),
                    }
                })
                .collect();
            results.push(MatchContext { offset, lines });
        }

        Ok(results)
    }
}

/// Iterator over [`HexPage`]s, produced by [`HexRenderer::view_paged`].
pub struct Pages<'a> {
    renderer: HexRenderer,
    chunks: ChunkIter<'a>,
    lines_per_page: usize,
    done: bool,
}

impl Iterator for Pages<'_> {
    type Item = StoreResult<HexPage>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut page: Option<HexPage> = None;
        while page.as_ref().map_or(0, |p| p.lines.len()) < self.lines_per_page {
            match self.chunks.next() {
                Some(Ok((offset, chunk))) => {
                    let line = self.renderer.format_line(offset, &chunk);
                    page.get_or_insert_with(|| HexPage { offset, lines: Vec::new() })
                        .lines
                        .push(line);
                }
                Some(Err(err)) => {
                    self.done = true;
                    return Some(Err(err));
                }
                None => {
                    self.done = true;
                    break;
                }
            }
        }
        page.map(Ok)
    }
}
