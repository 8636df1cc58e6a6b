//! Whole-file decoding.
//!
//! [`SorFile::from_bytes`] reads the Map, walks its directory and dispatches
//! each block range to the matching codec in [`crate::blocks`].

mod sor_file;

pub use sor_file::SorFile;
