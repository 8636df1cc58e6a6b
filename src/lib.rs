#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

//! # sor-rs
//!
//! A Rust library for reading, writing and analyzing OTDR trace files in the
//! Bellcore/Telcordia SR-4731 "SOR" format.
//!
//! An optical time-domain reflectometer fires light pulses into a fiber and
//! records the backscattered power over time. The instrument stores the
//! result as a `.sor` file: a directory block (the *Map*) followed by
//! parameter blocks, a table of key events and the sampled trace itself.
//!
//! ## Features
//!
//! - **Reading**: Decode every standard block into typed structs, keeping unknown
//!   vendor blocks verbatim
//! - **Writing**: Re-encode a decoded file, rebuilding the Map from the actual block sizes
//! - **Analysis**: Detect back reflections and fiber issues along the trace
//!   (`std` feature)
//! - **JSON**: Export decoded files and load analyzer settings (`serde_json` feature)
//!
//! ## Supported Blocks
//!
//! | Identifier | Type | Notes |
//! |------------|------|-------|
//! | `Map` | [`blocks::MapBlock`] | Always first; required |
//! | `GenParams` | [`blocks::GeneralParametersBlock`] | |
//! | `SupParams` | [`blocks::SupplierParametersBlock`] | |
//! | `FxdParams` | [`blocks::FixedParametersBlock`] | |
//! | `KeyEvents` | [`blocks::KeyEvents`] | |
//! | `LnkParams` | [`blocks::LinkParameters`] | Encoded when present, skipped on decode |
//! | `DataPts` | [`blocks::DataPoints`] | |
//! | `Cksum` | | Skipped on decode, never written |
//! | anything else | [`blocks::ProprietaryBlock`] | Kept verbatim |
//!
//! ## Quick Start
//!
//! ### Reading a SOR file
//!
//! ```no_run
//! use sor_rs::{SorFile, Result};
//!
//! fn main() -> Result<()> {
//!     let sor = SorFile::from_file("trace.sor")?;
//!
//!     if let Some(fixed) = &sor.fixed_parameters {
//!         println!("Refractive index: {}", fixed.refractive_index());
//!     }
//!     if let Some(events) = &sor.key_events {
//!         for event in events.iter() {
//!             println!("event {}: {} dB", event.event_number, event.event_loss);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ### Re-encoding a file
//!
//! ```no_run
//! use sor_rs::{SorFile, Result};
//!
//! fn main() -> Result<()> {
//!     let mut sor = SorFile::from_file("trace.sor")?;
//!     if let Some(general) = sor.general_parameters.as_mut() {
//!         general.comment = "re-terminated".into();
//!     }
//!     sor.write_to_file("trace-edited.sor")?;
//!     Ok(())
//! }
//! ```
//!
//! ### Analyzing a trace
//!
//! ```no_run
//! use sor_rs::{SorFile, Result, analyze, ScanType};
//!
//! fn main() -> Result<()> {
//!     let sor = SorFile::from_file("olt1_p3_short_001.sor")?;
//!     let report = analyze(&sor, 50.0, 25_000.0, ScanType::Short);
//!     println!("{}", report.diagnostic);
//!     for range in &report.back_reflections {
//!         println!("reflection {:.1}..{:.1} m", range.start, range.end);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`blocks`] | Block structures and their byte codecs |
//! | [`parsing`] | Whole-file decoding into [`SorFile`] |
//! | [`writer`] | Whole-file encoding with [`SorWriter`] |
//! | `analysis` | Trace analysis (`std` feature) |
//! | [`error`] | Error types and [`Result`] alias |
//!
//! ## Error Handling
//!
//! All fallible codec operations return [`Result<T>`], which is an alias for
//! `core::result::Result<T, Error>`. Use [`Error::kind`] to tell malformed
//! input ([`ErrorKind::Format`]) from a file/Map mismatch
//! ([`ErrorKind::Consistency`]) or a value that cannot be written
//! ([`ErrorKind::Encoding`]). Trace analysis reports failures inside its
//! result instead of returning an error.

extern crate alloc;

pub mod blocks;
pub mod error;
pub mod parsing;
pub mod writer;

#[cfg(feature = "std")]
pub mod analysis;

// Re-export commonly used types at the crate root
pub use error::{Error, ErrorKind, Result};
pub use parsing::SorFile;
pub use writer::{SorWriter, encode};

#[cfg(feature = "std")]
pub use analysis::{AnalysisConfig, AnalysisReport, EventRange, ScanType, Trace, analyze};

/// Decode a complete SOR file. Same as [`SorFile::from_bytes`].
pub fn decode(data: &[u8]) -> Result<SorFile> {
    SorFile::from_bytes(data)
}
