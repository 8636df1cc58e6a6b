// blocks/common.rs
//! Common types, traits, and helper functions for SOR block parsing.
//!
//! This module provides:
//! - [`ByteCursor`]: a bounds-checked reader over a block's bytes
//! - [`BlockBuilder`]: an append-only writer producing a block's bytes
//! - [`BlockParse`] / [`BlockWrite`]: traits implemented by every tagged block
//!
//! Every SOR block starts with its ASCII identifier followed by a single NUL
//! byte. All integers are little-endian.

use crate::{Error, Result};
use alloc::string::{String, ToString};
use alloc::vec::Vec;

// ============================================================================
// Validation Helpers
// ============================================================================

/// Validate that a buffer has at least `expected` bytes.
///
/// Returns `Err(TooShortBuffer)` if the buffer is too small.
#[inline]
pub fn validate_buffer_size(bytes: &[u8], expected: usize) -> Result<()> {
    if bytes.len() < expected {
        return Err(Error::TooShortBuffer {
            actual: bytes.len(),
            expected,
            file: file!(),
            line: line!(),
        });
    }
    Ok(())
}

/// Convert a declared element count to `usize`, rejecting negative values.
#[inline]
pub fn checked_count(value: i64, field: &'static str) -> Result<usize> {
    usize::try_from(value).map_err(|_| Error::InvalidCount { field, value })
}

/// Check that a vector's length agrees with the count field written before it.
#[inline]
pub fn validate_count(declared: i64, actual: usize, field: &'static str) -> Result<()> {
    if usize::try_from(declared).ok() != Some(actual) {
        return Err(Error::InvalidCount {
            field,
            value: declared,
        });
    }
    Ok(())
}

// ============================================================================
// Reading
// ============================================================================

/// A forward-only reader over a byte slice.
///
/// Every read checks the remaining length first; a short buffer yields
/// [`Error::TooShortBuffer`] and leaves the cursor where it was.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor positioned at the start of `bytes`.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    /// Current position relative to the start of the buffer.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of bytes not yet consumed.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    /// Returns true once every byte has been consumed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Consume exactly `n` bytes.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let rest = &self.bytes[self.offset..];
        validate_buffer_size(rest, n)?;
        let slice = &rest[..n];
        self.offset += n;
        Ok(slice)
    }

    /// Consume everything left in the buffer.
    pub fn take_rest(&mut self) -> &'a [u8] {
        let rest = &self.bytes[self.offset..];
        self.offset = self.bytes.len();
        rest
    }

    #[inline]
    pub fn read_u16(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    #[inline]
    pub fn read_i16(&mut self) -> Result<i16> {
        let b = self.take(2)?;
        Ok(i16::from_le_bytes([b[0], b[1]]))
    }

    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    #[inline]
    pub fn read_i32(&mut self) -> Result<i32> {
        let b = self.take(4)?;
        Ok(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Read a string stored in exactly `n_bytes` bytes.
    ///
    /// The cursor always advances by `n_bytes` on success; NUL bytes inside
    /// the field are kept as characters.
    pub fn read_fixed_str(&mut self, n_bytes: usize) -> Result<String> {
        let start = self.offset;
        let raw = self.take(n_bytes)?;
        match core::str::from_utf8(raw) {
            Ok(s) => Ok(s.to_string()),
            Err(_) => {
                self.offset = start;
                Err(Error::InvalidUtf8 { offset: start })
            }
        }
    }

    /// Read a UTF-8 string terminated by a NUL byte. The terminator is
    /// consumed but not returned.
    pub fn read_nul_str(&mut self) -> Result<String> {
        let start = self.offset;
        let rest = &self.bytes[start..];
        let end = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or(Error::MissingNulTerminator { offset: start })?;
        let s = core::str::from_utf8(&rest[..end])
            .map_err(|_| Error::InvalidUtf8 { offset: start })?;
        self.offset += end + 1;
        Ok(s.to_string())
    }

    /// Consume a literal block tag followed by a single NUL byte.
    pub fn expect_header(&mut self, tag: &str) -> Result<()> {
        let rest = &self.bytes[self.offset..];
        let tag_bytes = tag.as_bytes();
        let wanted = tag_bytes.len() + 1;
        let found = &rest[..rest.len().min(wanted)];
        if found.len() < wanted || &found[..tag_bytes.len()] != tag_bytes || found[wanted - 1] != 0
        {
            return Err(Error::BlockIDError {
                actual: String::from_utf8_lossy(found)
                    .trim_end_matches('\0')
                    .to_string(),
                expected: tag.to_string(),
            });
        }
        self.offset += wanted;
        Ok(())
    }

    /// Capacity to reserve for `count` elements of `width` bytes each,
    /// bounded by what the remaining buffer could possibly hold.
    #[inline]
    pub fn capacity_for(&self, count: usize, width: usize) -> usize {
        count.min(self.remaining() / width.max(1))
    }
}

// ============================================================================
// Writing
// ============================================================================

/// Append-only byte builder used by every block encoder.
#[derive(Debug, Clone, Default)]
pub struct BlockBuilder {
    buffer: Vec<u8>,
}

impl BlockBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Write a block tag and its NUL terminator.
    pub fn write_header(&mut self, tag: &str) -> Result<()> {
        self.write_nul_str("block header", tag)
    }

    #[inline]
    pub fn write_u16(&mut self, value: u16) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    #[inline]
    pub fn write_i16(&mut self, value: i16) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    #[inline]
    pub fn write_u32(&mut self, value: u32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    #[inline]
    pub fn write_i32(&mut self, value: i32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Write a string followed by a NUL terminator.
    ///
    /// A NUL inside `value` would end the field early on decode, so it is
    /// rejected with [`Error::InteriorNul`].
    pub fn write_nul_str(&mut self, field: &'static str, value: &str) -> Result<()> {
        if let Some(position) = value.bytes().position(|b| b == 0) {
            return Err(Error::InteriorNul { field, position });
        }
        self.buffer.extend_from_slice(value.as_bytes());
        self.buffer.push(0);
        Ok(())
    }

    /// Write a string occupying exactly `width` bytes, one byte per character.
    pub fn write_fixed_str(&mut self, field: &'static str, value: &str, width: usize) -> Result<()> {
        if let Some(character) = value.chars().find(|c| c.len_utf8() != 1) {
            return Err(Error::MultiByteCharacter { field, character });
        }
        if value.len() != width {
            return Err(Error::FixedStringLength {
                field,
                expected: width,
                actual: value.len(),
            });
        }
        self.buffer.extend_from_slice(value.as_bytes());
        Ok(())
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }
}

// ============================================================================
// Block traits
// ============================================================================

/// A block that begins with a fixed identifier tag and can be decoded from
/// the byte range the Map assigns to it.
pub trait BlockParse: Sized {
    const ID: &'static str;

    fn parse_header(cursor: &mut ByteCursor<'_>) -> Result<()> {
        cursor.expect_header(Self::ID)
    }

    /// Decode the fields following the header.
    fn parse_body(cursor: &mut ByteCursor<'_>) -> Result<Self>;

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(bytes);
        Self::parse_header(&mut cursor)?;
        Self::parse_body(&mut cursor)
    }
}

/// The encoding half of [`BlockParse`].
pub trait BlockWrite {
    const ID: &'static str;

    /// Append the fields following the header.
    fn write_body(&self, builder: &mut BlockBuilder) -> Result<()>;

    fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut builder = BlockBuilder::new();
        builder.write_header(Self::ID)?;
        self.write_body(&mut builder)?;
        Ok(builder.into_inner())
    }
}
