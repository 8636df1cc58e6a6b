//! Error types for SOR operations.
//!
//! This module defines the [`Error`] enum which represents all possible failures
//! that can occur when decoding or encoding SOR files. Errors fall into three
//! families, reported by [`Error::kind`]:
//!
//! - [`ErrorKind::Format`]: the input bytes do not follow the SOR layout
//! - [`ErrorKind::Consistency`]: an aggregate cannot be encoded against the
//!   directory it was paired with
//! - [`ErrorKind::Encoding`]: a field value cannot be represented on the wire
//!
//! Trace analysis never produces an [`Error`]; it reports failures through
//! [`crate::analysis::AnalysisReport`] instead.
//!
//! # Example
//!
//! ```no_run
//! use sor_rs::{SorFile, Error, ErrorKind};
//!
//! fn load(path: &str) -> Option<SorFile> {
//!     match SorFile::from_file(path) {
//!         Ok(sor) => Some(sor),
//!         Err(e) if e.kind() == ErrorKind::Format => {
//!             eprintln!("Not a valid SOR file: {e}");
//!             None
//!         }
//!         Err(e) => {
//!             eprintln!("Failed to read {path}: {e}");
//!             None
//!         }
//!     }
//! }
//! ```

use core::fmt;

use alloc::string::String;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Structural violation in the input bytes.
    Format,
    /// An aggregate does not agree with the directory used to encode it.
    Consistency,
    /// A value cannot be written in its wire representation.
    Encoding,
    /// Reading or writing a file failed.
    Io,
}

/// Errors that can occur during SOR file operations.
#[derive(Debug)]
pub enum Error {
    /// Buffer provided for parsing was too small.
    ///
    /// This typically indicates file corruption or a truncated block.
    TooShortBuffer {
        /// Actual number of bytes available
        actual: usize,
        /// Minimum number of bytes required
        expected: usize,
        /// Source file where the error was detected
        file: &'static str,
        /// Line number where the error was detected
        line: u32,
    },

    /// A block did not start with the expected identifier tag.
    BlockIDError {
        /// The bytes that were found, decoded lossily
        actual: String,
        /// The identifier that was expected
        expected: String,
    },

    /// A null-terminated string ran to the end of the buffer.
    MissingNulTerminator {
        /// Offset where the string started
        offset: usize,
    },

    /// A string field did not contain valid UTF-8.
    InvalidUtf8 {
        /// Offset where the string started
        offset: usize,
    },

    /// A declared element count is outside its valid range.
    InvalidCount {
        /// Name of the count field
        field: &'static str,
        /// The value found in the file
        value: i64,
    },

    /// Summing directory entry sizes overflowed the addressable range.
    OffsetOverflow {
        /// Identifier of the entry being accumulated
        identifier: String,
    },

    /// A directory entry points outside the file.
    BlockOutOfRange {
        /// Identifier of the block
        identifier: String,
        /// Offset where the block would start
        offset: usize,
        /// Declared size of the block
        size: usize,
        /// Total buffer length
        buffer_len: usize,
    },

    /// A block identifier was requested that the directory does not list.
    BlockNotFound(String),

    /// A block being encoded has no entry in the original Map.
    MissingMapEntry(String),

    /// A fixed-length string contains a character wider than one byte.
    MultiByteCharacter {
        /// Name of the field
        field: &'static str,
        /// The offending character
        character: char,
    },

    /// A fixed-length string does not have the width required by its field.
    FixedStringLength {
        /// Name of the field
        field: &'static str,
        /// Required width in bytes
        expected: usize,
        /// Width of the supplied value
        actual: usize,
    },

    /// A NUL-terminated string contains a NUL byte of its own.
    InteriorNul {
        /// Name of the field
        field: &'static str,
        /// Byte offset of the NUL within the value
        position: usize,
    },

    /// A length does not fit in the integer width of its wire field.
    FieldOverflow {
        /// Name of the field
        field: &'static str,
        /// The value that did not fit
        value: usize,
    },

    /// An I/O error occurred while reading or writing a file.
    ///
    /// Only available with the `std` feature.
    #[cfg(feature = "std")]
    IOError(std::io::Error),

    /// Failed to serialize a structure to JSON.
    SerializationError(String),
}

impl Error {
    /// Returns the family this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::TooShortBuffer { .. }
            | Error::BlockIDError { .. }
            | Error::MissingNulTerminator { .. }
            | Error::InvalidUtf8 { .. }
            | Error::InvalidCount { .. }
            | Error::OffsetOverflow { .. }
            | Error::BlockOutOfRange { .. }
            | Error::BlockNotFound(_) => ErrorKind::Format,
            Error::MissingMapEntry(_) => ErrorKind::Consistency,
            Error::MultiByteCharacter { .. }
            | Error::FixedStringLength { .. }
            | Error::InteriorNul { .. }
            | Error::FieldOverflow { .. }
            | Error::SerializationError(_) => ErrorKind::Encoding,
            #[cfg(feature = "std")]
            Error::IOError(_) => ErrorKind::Io,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::TooShortBuffer {
                actual,
                expected,
                file,
                line,
            } => write!(
                f,
                "Buffer too small at {file}:{line}: need at least {expected} bytes, got {actual}"
            ),
            Error::BlockIDError { actual, expected } => {
                write!(
                    f,
                    "Invalid block identifier: Expected {expected:?}, got {actual:?}"
                )
            }
            Error::MissingNulTerminator { offset } => {
                write!(f, "Null terminator not found for string at offset {offset}")
            }
            Error::InvalidUtf8 { offset } => {
                write!(f, "Invalid UTF-8 in string at offset {offset}")
            }
            Error::InvalidCount { field, value } => {
                write!(f, "Invalid {field}: {value}")
            }
            Error::OffsetOverflow { identifier } => write!(
                f,
                "Block offset overflowed while locating {identifier:?}; a directory size is incorrect"
            ),
            Error::BlockOutOfRange {
                identifier,
                offset,
                size,
                buffer_len,
            } => write!(
                f,
                "Block {identifier:?} at offset {offset} with size {size} exceeds buffer of {buffer_len} bytes"
            ),
            Error::BlockNotFound(id) => write!(f, "Block {id:?} is not listed in the Map"),
            Error::MissingMapEntry(id) => write!(
                f,
                "Block {id:?} has no entry in the original Map; its revision number is unknown"
            ),
            Error::MultiByteCharacter { field, character } => write!(
                f,
                "Character {character:?} in fixed-length field {field} requires more than one byte"
            ),
            Error::FixedStringLength {
                field,
                expected,
                actual,
            } => write!(
                f,
                "Fixed-length field {field} must be {expected} bytes, got {actual}"
            ),
            Error::InteriorNul { field, position } => write!(
                f,
                "Field {field} contains a NUL byte at position {position}"
            ),
            Error::FieldOverflow { field, value } => {
                write!(f, "Value {value} does not fit in field {field}")
            }
            #[cfg(feature = "std")]
            Error::IOError(e) => write!(f, "I/O error: {e}"),
            Error::SerializationError(s) => write!(f, "Serialization error: {s}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IOError(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IOError(err)
    }
}

/// A specialized Result type for SOR operations.
pub type Result<T> = core::result::Result<T, Error>;
