//! Byte-level access to a file-like resource.
//!
//! Every analysis in this crate reads through the [`ByteStore`] trait rather than
//! opening handles itself. Two implementations are provided:
//! - [`FileStore`]: a path on the local filesystem.
//! - [`MemoryStore`]: an owned buffer, handy for tests and for callers that
//!   already hold the bytes.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use md5::Md5;
use memchr::memmem;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Chunk size used by the default streaming helpers.
pub const DEFAULT_CHUNK_SIZE: usize = 8192;

/// Error type for byte store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying I/O failure, tagged with the resource it happened on.
    #[error("I/O error on {label}: {source}")]
    Io {
        label: String,
        #[source]
        source: std::io::Error,
    },

    /// The resource is gone (or never existed) when a read was attempted.
    #[error("{0} does not exist")]
    Missing(String),
}

/// Convenience result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Lazy sequence of `(offset, bytes)` chunks.
pub type ChunkIter<'a> = Box<dyn Iterator<Item = StoreResult<(u64, Vec<u8>)>> + 'a>;

/// Supported checksum algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumAlgorithm {
    Md5,
    Sha1,
    Sha256,
}

impl ChecksumAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChecksumAlgorithm::Md5 => "md5",
            ChecksumAlgorithm::Sha1 => "sha1",
            ChecksumAlgorithm::Sha256 => "sha256",
        }
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChecksumAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "md5" => Ok(ChecksumAlgorithm::Md5),
            "sha1" | "sha-1" => Ok(ChecksumAlgorithm::Sha1),
            "sha256" | "sha-256" => Ok(ChecksumAlgorithm::Sha256),
            other => {
                Err(format!("Unsupported checksum algorithm '{other}'. Allowed: md5, sha1, sha256"))
            }
        }
    }
}

/// Read-side collaborator consumed by the analysis engine.
///
/// Only `label`, `exists`, `size`, `read` and `read_chunks` are required; the
/// rest have default implementations built on top of them.
pub trait ByteStore {
    /// Human-readable name of the resource (usually its path).
    fn label(&self) -> String;

    fn exists(&self) -> bool;

    fn size(&self) -> StoreResult<u64>;

    /// Read up to `len` bytes starting at `offset`. Short reads happen at EOF.
    fn read(&self, offset: u64, len: usize) -> StoreResult<Vec<u8>>;

    /// Stream the resource front to back in chunks of at most `chunk_size` bytes.
    fn read_chunks(&self, chunk_size: usize) -> StoreResult<ChunkIter<'_>>;

    /// Last modification time, when the backing resource records one.
    fn modified(&self) -> Option<DateTime<Utc>> {
        None
    }

    /// Whole contents as a single buffer.
    fn read_all(&self) -> StoreResult<Vec<u8>> {
        let size = self.size()?;
        self.read(0, size as usize)
    }

    /// Offsets of `pattern`, in ascending order, overlapping matches included.
    ///
    /// `max_results` of `None` means unlimited. An empty pattern never matches.
    fn find(&self, pattern: &[u8], max_results: Option<usize>) -> StoreResult<Vec<u64>> {
        if pattern.is_empty() {
            return Ok(Vec::new());
        }
        let limit = max_results.unwrap_or(usize::MAX);
        let mut offsets = Vec::new();
        if limit == 0 {
            return Ok(offsets);
        }
        let data = self.read_all()?;
        let finder = memmem::Finder::new(pattern);
        let mut start = 0;
        // Restart one past each hit so overlapping matches are reported.
        while let Some(pos) = finder.find(&data[start..]) {
            offsets.push((start + pos) as u64);
            if offsets.len() >= limit {
                break;
            }
            start += pos + 1;
        }
        Ok(offsets)
    }

    /// Hex digest of the full contents, computed over streamed chunks.
    fn checksum(&self, algorithm: ChecksumAlgorithm) -> StoreResult<String> {
        let chunks = self.read_chunks(DEFAULT_CHUNK_SIZE)?;
        match algorithm {
            ChecksumAlgorithm::Md5 => digest_chunks::<Md5>(chunks),
            ChecksumAlgorithm::Sha1 => digest_chunks::<Sha1>(chunks),
            ChecksumAlgorithm::Sha256 => digest_chunks::<Sha256>(chunks),
        }
    }
}

fn digest_chunks<D: Digest>(chunks: ChunkIter<'_>) -> StoreResult<String> {
    let mut hasher = D::new();
    for chunk in chunks {
        let (_, bytes) = chunk?;
        hasher.update(&bytes);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// A file on the local filesystem.
///
/// Every call opens its own handle; nothing is kept open between calls.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> StoreError {
        StoreError::Io { label: self.label(), source }
    }

    fn open(&self) -> StoreResult<File> {
        File::open(&self.path).map_err(|e| self.io_err(e))
    }
}

impl ByteStore for FileStore {
    fn label(&self) -> String {
        self.path.display().to_string()
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn size(&self) -> StoreResult<u64> {
        std::fs::metadata(&self.path).map(|m| m.len()).map_err(|e| self.io_err(e))
    }

    fn read(&self, offset: u64, len: usize) -> StoreResult<Vec<u8>> {
        let mut file = self.open()?;
        file.seek(SeekFrom::Start(offset)).map_err(|e| self.io_err(e))?;
        let mut buf = Vec::with_capacity(len.min(1 << 20));
        file.take(len as u64).read_to_end(&mut buf).map_err(|e| self.io_err(e))?;
        Ok(buf)
    }

    fn read_chunks(&self, chunk_size: usize) -> StoreResult<ChunkIter<'_>> {
        let file = self.open()?;
        Ok(Box::new(FileChunks {
            label: self.label(),
            reader: BufReader::new(file),
            chunk_size: chunk_size.max(1),
            offset: 0,
            done: false,
        }))
    }

    fn read_all(&self) -> StoreResult<Vec<u8>> {
        std::fs::read(&self.path).map_err(|e| self.io_err(e))
    }

    fn modified(&self) -> Option<DateTime<Utc>> {
        let modified = std::fs::metadata(&self.path).and_then(|m| m.modified()).ok()?;
        Some(DateTime::<Utc>::from(modified))
    }
}

/// Sequential chunk reader over an open file.
struct FileChunks {
    label: String,
    reader: BufReader<File>,
    chunk_size: usize,
    offset: u64,
    done: bool,
}

impl Iterator for FileChunks {
    type Item = StoreResult<(u64, Vec<u8>)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut buf = Vec::with_capacity(self.chunk_size);
        // `take` keeps reading until the chunk is full or EOF, so chunks stay aligned.
        match self.reader.by_ref().take(self.chunk_size as u64).read_to_end(&mut buf) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(n) => {
                let start = self.offset;
                self.offset += n as u64;
                Some(Ok((start, buf)))
            }
            Err(source) => {
                self.done = true;
                Some(Err(StoreError::Io { label: self.label.clone(), source }))
            }
        }
    }
}

/// An in-memory byte buffer exposed through [`ByteStore`].
///
/// A store built with [`MemoryStore::missing`] reports `exists() == false` and
/// fails every read, which mirrors a path that is not on disk.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    label: String,
    data: Option<Vec<u8>>,
}

impl MemoryStore {
    pub fn new(label: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self { label: label.into(), data: Some(data.into()) }
    }

    pub fn missing(label: impl Into<String>) -> Self {
        Self { label: label.into(), data: None }
    }

    fn bytes(&self) -> StoreResult<&[u8]> {
        self.data.as_deref().ok_or_else(|| StoreError::Missing(self.label.clone()))
    }
}

impl ByteStore for MemoryStore {
    fn label(&self) -> String {
        self.label.clone()
    }

    fn exists(&self) -> bool {
        self.data.is_some()
    }

    fn size(&self) -> StoreResult<u64> {
        Ok(self.bytes()?.len() as u64)
    }

    fn read(&self, offset: u64, len: usize) -> StoreResult<Vec<u8>> {
        let data = self.bytes()?;
        let start = usize::try_from(offset).unwrap_or(usize::MAX).min(data.len());
        let end = start.saturating_add(len).min(data.len());
        Ok(data[start..end].to_vec())
    }

    fn read_chunks(&self, chunk_size: usize) -> StoreResult<ChunkIter<'_>> {
        let data = self.bytes()?;
        let chunk_size = chunk_size.max(1);
        Ok(Box::new(
            data.chunks(chunk_size)
                .enumerate()
                .map(move |(idx, chunk)| {
                    Ok::<_, StoreError>(((idx * chunk_size) as u64, chunk.to_vec()))
                }),
        ))
    }

    fn read_all(&self) -> StoreResult<Vec<u8>> {
        Ok(self.bytes()?.to_vec())
    }
}
