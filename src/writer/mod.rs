//! SOR file writer.
//!
//! This module provides [`SorWriter`], which turns a [`SorFile`] back into
//! bytes. Encoding happens in two separate passes:
//!
//! 1. Every present block is serialized on its own, in a fixed order:
//!    GenParams, SupParams, FxdParams, KeyEvents, LnkParams, DataPts, then
//!    proprietary blocks in the order they are stored, each under the
//!    identifier it was listed with.
//! 2. A fresh Map is built with one entry per serialized block, and the
//!    output is the encoded Map followed by the block bodies in that order.
//!
//! Revision numbers are not derivable from block contents, so each entry
//! borrows the revision of the same identifier from the Map the file was
//! decoded with. Checksum blocks are never written.
//!
//! # Example
//!
//! ```no_run
//! use sor_rs::{SorFile, SorWriter, Result};
//!
//! fn rewrite(path: &str) -> Result<Vec<u8>> {
//!     let mut sor = SorFile::from_file(path)?;
//!     if let Some(general) = sor.general_parameters.as_mut() {
//!         general.comment = "re-tested".into();
//!     }
//!     SorWriter::new(&sor.map).encode(&sor)
//! }
//! ```

use crate::{
    Result, SorFile,
    blocks::{
        BLOCK_ID_DATAPTS, BLOCK_ID_FXDPARAMS, BLOCK_ID_GENPARAMS, BLOCK_ID_KEYEVENTS,
        BLOCK_ID_LNKPARAMS, BLOCK_ID_SUPPARAMS, BlockBuilder, BlockWrite, MapBlock,
    },
};
use alloc::vec::Vec;

/// A serialized block waiting for its directory entry.
#[derive(Debug)]
struct EncodedBlock<'a> {
    identifier: &'a str,
    bytes: Vec<u8>,
}

/// Encodes [`SorFile`]s against an original Map.
#[derive(Debug, Clone, Copy)]
pub struct SorWriter<'m> {
    original_map: &'m MapBlock,
}

impl<'m> SorWriter<'m> {
    /// Create a writer that takes revision numbers from `original_map`.
    pub fn new(original_map: &'m MapBlock) -> Self {
        Self { original_map }
    }

    /// Encode `file` into a complete SOR byte stream.
    ///
    /// # Errors
    /// - [`crate::Error::MissingMapEntry`] if a present block has no entry in
    ///   the original Map.
    /// - [`crate::Error::MultiByteCharacter`] or
    ///   [`crate::Error::FixedStringLength`] if a fixed-length field cannot be
    ///   written.
    /// - [`crate::Error::InteriorNul`] if a NUL-terminated string or block
    ///   identifier contains a NUL byte.
    /// - [`crate::Error::InvalidCount`] if a count field disagrees with the
    ///   length of the list it describes.
    pub fn encode(&self, file: &SorFile) -> Result<Vec<u8>> {
        let blocks = Self::encode_blocks(file)?;
        let map = self.build_map(&blocks)?;

        let map_bytes = map.to_bytes()?;
        debug_assert_eq!(map_bytes.len() as i64, i64::from(map.block_size));

        let body_len: usize = blocks.iter().map(|b| b.bytes.len()).sum();
        let mut output = BlockBuilder::with_capacity(map_bytes.len() + body_len);
        output.write_bytes(&map_bytes);
        for block in &blocks {
            output.write_bytes(&block.bytes);
        }

        tracing::debug!(
            blocks = blocks.len(),
            bytes = output.len(),
            "Encoded SOR file"
        );
        Ok(output.into_inner())
    }

    /// First pass: serialize every present block.
    fn encode_blocks(file: &SorFile) -> Result<Vec<EncodedBlock<'_>>> {
        let mut blocks = Vec::new();
        push_block(&mut blocks, BLOCK_ID_GENPARAMS, file.general_parameters.as_ref())?;
        push_block(&mut blocks, BLOCK_ID_SUPPARAMS, file.supplier_parameters.as_ref())?;
        push_block(&mut blocks, BLOCK_ID_FXDPARAMS, file.fixed_parameters.as_ref())?;
        push_block(&mut blocks, BLOCK_ID_KEYEVENTS, file.key_events.as_ref())?;
        push_block(&mut blocks, BLOCK_ID_LNKPARAMS, file.link_parameters.as_ref())?;
        push_block(&mut blocks, BLOCK_ID_DATAPTS, file.data_points.as_ref())?;
        for block in &file.proprietary_blocks {
            blocks.push(EncodedBlock {
                identifier: &block.identifier,
                bytes: block.to_bytes()?,
            });
        }
        Ok(blocks)
    }

    /// Second pass: one directory entry per serialized block.
    fn build_map(&self, blocks: &[EncodedBlock<'_>]) -> Result<MapBlock> {
        let mut map = MapBlock::new(self.original_map.revision_number);
        for block in blocks {
            map.push_entry(self.original_map, block.identifier, block.bytes.len())?;
        }
        Ok(map)
    }
}

fn push_block<'a, B: BlockWrite>(
    blocks: &mut Vec<EncodedBlock<'a>>,
    identifier: &'a str,
    block: Option<&B>,
) -> Result<()> {
    if let Some(block) = block {
        blocks.push(EncodedBlock {
            identifier,
            bytes: block.to_bytes()?,
        });
    }
    Ok(())
}

/// Encode `file` against `original_map`. See [`SorWriter::encode`].
pub fn encode(file: &SorFile, original_map: &MapBlock) -> Result<Vec<u8>> {
    SorWriter::new(original_map).encode(file)
}
