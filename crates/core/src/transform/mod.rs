//! Byte-wise transforms and exact comparison.
//!
//! Both stream through the store in chunks, so memory use is bounded by the
//! chunk size regardless of file size.

use std::io::Write;

use crate::error::{InspectError, InspectResult};
use crate::model::{ComparisonReason, ComparisonResult, Difference};
use crate::store::ByteStore;

/// A reversible-or-not byte-wise rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ByteTransform {
    /// XOR against a repeating key; applying it twice restores the input.
    Xor(Vec<u8>),
    /// Add `n` modulo 256 (a Caesar shift over bytes).
    Shift(u8),
    /// Bitwise NOT.
    Invert,
}

impl ByteTransform {
    /// XOR with `key`, rejecting an empty key.
    pub fn xor(key: impl Into<Vec<u8>>) -> InspectResult<Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(InspectError::InvalidKey);
        }
        Ok(ByteTransform::Xor(key))
    }

    /// Additive shift; any signed amount is reduced modulo 256.
    pub fn shift(amount: i64) -> Self {
        ByteTransform::Shift(amount.rem_euclid(256) as u8)
    }

    /// The transform that undoes this one.
    pub fn inverse(&self) -> Self {
        match self {
            ByteTransform::Xor(key) => ByteTransform::Xor(key.clone()),
            ByteTransform::Shift(n) => ByteTransform::Shift(n.wrapping_neg()),
            ByteTransform::Invert => ByteTransform::Invert,
        }
    }

    /// Rewrite `chunk` in place; `position` is the absolute index of its first byte.
    pub fn apply_in_place(&self, chunk: &mut [u8], position: u64) {
        match self {
            ByteTransform::Xor(key) => {
                let len = key.len() as u64;
                for (i, byte) in chunk.iter_mut().enumerate() {
                    *byte ^= key[((position + i as u64) % len) as usize];
                }
            }
            ByteTransform::Shift(n) => chunk.iter_mut().for_each(|b| *b = b.wrapping_add(*n)),
            ByteTransform::Invert => chunk.iter_mut().for_each(|b| *b = !*b),
        }
    }
}

/// Stream `store` through `transform` into `sink`. Returns bytes written.
pub fn apply<S: ByteStore + ?Sized, W: Write>(
    store: &S,
    transform: &ByteTransform,
    sink: &mut W,
    chunk_size: usize,
) -> InspectResult<u64> {
    if let ByteTransform::Xor(key) = transform {
        if key.is_empty() {
            return Err(InspectError::InvalidKey);
        }
    }
    let mut written = 0u64;
    for chunk in store.read_chunks(chunk_size)? {
        let (offset, mut bytes) = chunk?;
        transform.apply_in_place(&mut bytes, offset);
        sink.write_all(&bytes)?;
        written += bytes.len() as u64;
    }
    sink.flush()?;
    log::debug!("{}: transformed {written} bytes with {transform:?}", store.label());
    Ok(written)
}

/// Byte-for-byte comparison of `a` against `b`.
///
/// Differences are collected in offset order and capped at `max_differences`;
/// scanning stops once the cap is reached. `equal` reflects every mismatch,
/// including ones past the cap.
pub fn compare<A: ByteStore + ?Sized, B: ByteStore + ?Sized>(
    a: &A,
    b: &B,
    chunk_size: usize,
    max_differences: usize,
) -> InspectResult<ComparisonResult> {
    if !b.exists() {
        return Ok(ComparisonResult {
            equal: false,
            reason: ComparisonReason::OtherMissing,
            differences: Vec::new(),
            total_checked: 0,
        });
    }

    let size_a = a.size()?;
    let size_b = b.size()?;
    if size_a != size_b {
        return Ok(ComparisonResult {
            equal: false,
            reason: ComparisonReason::SizeMismatch { size_a, size_b },
            differences: Vec::new(),
            total_checked: 0,
        });
    }

    let chunk_size = chunk_size.max(1);
    let mut differences = Vec::new();
    let mut mismatch_seen = false;
    let mut offset = 0u64;
    'scan: while offset < size_a {
        let left = a.read(offset, chunk_size)?;
        let right = b.read(offset, chunk_size)?;
        for (i, (&byte_a, &byte_b)) in left.iter().zip(right.iter()).enumerate() {
            if byte_a != byte_b {
                mismatch_seen = true;
                if differences.len() >= max_differences {
                    break 'scan;
                }
                differences.push(Difference { offset: offset + i as u64, byte_a, byte_b });
            }
        }
        if left.is_empty() {
            break;
        }
        offset += left.len() as u64;
    }

    let equal = !mismatch_seen;
    Ok(ComparisonResult {
        equal,
        reason: if equal { ComparisonReason::Identical } else { ComparisonReason::Different },
        differences,
        total_checked: size_a,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn run(transform: &ByteTransform, data: &[u8], chunk_size: usize) -> Vec<u8> {
        let store = MemoryStore::new("mem", data.to_vec());
        let mut out = Vec::new();
        apply(&store, transform, &mut out, chunk_size).unwrap();
        out
    }

    #[test]
    fn xor_key_index_continues_across_chunks() {
        let key = ByteTransform::xor(vec![0x01, 0x02, 0x03]).unwrap();
        let whole = run(&key, b"abcdefgh", 8192);
        let chunked = run(&key, b"abcdefgh", 2);
        assert_eq!(whole, chunked);
        assert_eq!(run(&key, &whole, 3), b"abcdefgh");
    }

    #[test]
    fn empty_xor_key_is_rejected() {
        assert!(matches!(ByteTransform::xor(Vec::new()), Err(InspectError::InvalidKey)));
    }

    #[test]
    fn shift_wraps_and_inverse_restores() {
        let shift = ByteTransform::shift(-1);
        assert_eq!(shift, ByteTransform::Shift(255));
        let shifted = run(&shift, &[0x00, 0x10, 0xFF], 4);
        assert_eq!(shifted, vec![0xFF, 0x0F, 0xFE]);
        assert_eq!(run(&shift.inverse(), &shifted, 4), vec![0x00, 0x10, 0xFF]);
    }

    #[test]
    fn invert_flips_bits() {
        assert_eq!(run(&ByteTransform::Invert, &[0x00, 0xF0, 0xAA], 2), vec![0xFF, 0x0F, 0x55]);
    }

    #[test]
    fn compare_caps_differences() {
        let a = MemoryStore::new("a", vec![0u8; 500]);
        let b = MemoryStore::new("b", vec![1u8; 500]);
        let result = compare(&a, &b, 64, 100).unwrap();
        assert!(!result.equal);
        assert_eq!(result.differences.len(), 100);
        assert_eq!(result.differences[99].offset, 99);
        assert_eq!(result.total_checked, 500);
    }

    #[test]
    fn compare_with_zero_cap_still_detects_difference() {
        let a = MemoryStore::new("a", vec![0u8; 8]);
        let b = MemoryStore::new("b", vec![1u8; 8]);
        let result = compare(&a, &b, 4, 0).unwrap();
        assert!(!result.equal);
        assert_eq!(result.reason, ComparisonReason::Different);
        assert!(result.differences.is_empty());

        let same = compare(&a, &a.clone(), 4, 0).unwrap();
        assert!(same.equal);
        assert_eq!(same.reason, ComparisonReason::Identical);
    }

    #[test]
    fn compare_reports_size_mismatch_and_missing_other() {
        let a = MemoryStore::new("a", vec![0u8; 4]);
        let b = MemoryStore::new("b", vec![0u8; 5]);
        let result = compare(&a, &b, 8192, 100).unwrap();
        assert_eq!(result.reason, ComparisonReason::SizeMismatch { size_a: 4, size_b: 5 });

        let result = compare(&a, &MemoryStore::missing("c"), 8192, 100).unwrap();
        assert_eq!(result.reason, ComparisonReason::OtherMissing);
        assert!(!result.equal);
    }
}
