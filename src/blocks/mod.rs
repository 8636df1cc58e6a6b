// src/blocks/mod.rs

// ============================================================================
// Block Identifiers
// ============================================================================
// Every block in a SOR file is named by an ASCII identifier which appears both
// in the Map and, NUL-terminated, as the first bytes of the block itself.

/// Directory block at offset 0.
pub const BLOCK_ID_MAP: &str = "Map";
/// General parameters block.
pub const BLOCK_ID_GENPARAMS: &str = "GenParams";
/// Supplier parameters block.
pub const BLOCK_ID_SUPPARAMS: &str = "SupParams";
/// Fixed parameters block.
pub const BLOCK_ID_FXDPARAMS: &str = "FxdParams";
/// Key events block.
pub const BLOCK_ID_KEYEVENTS: &str = "KeyEvents";
/// Link parameters block.
pub const BLOCK_ID_LNKPARAMS: &str = "LnkParams";
/// Data points block.
pub const BLOCK_ID_DATAPTS: &str = "DataPts";
/// Checksum block.
pub const BLOCK_ID_CHECKSUM: &str = "Cksum";

// ============================================================================
// Submodules
// ============================================================================

mod common;
mod data_points_block;
mod fixed_parameters_block;
mod general_parameters_block;
mod key_events_block;
mod link_parameters_block;
mod map_block;
mod proprietary_block;
mod supplier_parameters_block;

// Re-export common types
pub use common::{BlockBuilder, BlockParse, BlockWrite, ByteCursor};

// Re-export block types
pub use data_points_block::{DataPoints, DataPointsAtScaleFactor};
pub use fixed_parameters_block::FixedParametersBlock;
pub use general_parameters_block::GeneralParametersBlock;
pub use key_events_block::{KeyEvent, KeyEvents, LastKeyEvent};
pub use link_parameters_block::{Landmark, LinkParameters};
pub use map_block::{BlockInfo, MAP_FIXED_SIZE, MapBlock};
pub use proprietary_block::ProprietaryBlock;
pub use supplier_parameters_block::SupplierParametersBlock;

/// The kinds of block a Map entry can name.
///
/// Identifier dispatch goes through this enum so that adding a kind forces
/// every `match` over it to be revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Map,
    GeneralParameters,
    SupplierParameters,
    FixedParameters,
    KeyEvents,
    LinkParameters,
    DataPoints,
    Checksum,
    /// Any identifier not defined by the format; stored as a [`ProprietaryBlock`].
    Proprietary,
}

impl BlockKind {
    /// Classify a Map identifier.
    pub fn from_identifier(identifier: &str) -> Self {
        match identifier {
            BLOCK_ID_MAP => BlockKind::Map,
            BLOCK_ID_GENPARAMS => BlockKind::GeneralParameters,
            BLOCK_ID_SUPPARAMS => BlockKind::SupplierParameters,
            BLOCK_ID_FXDPARAMS => BlockKind::FixedParameters,
            BLOCK_ID_KEYEVENTS => BlockKind::KeyEvents,
            BLOCK_ID_LNKPARAMS => BlockKind::LinkParameters,
            BLOCK_ID_DATAPTS => BlockKind::DataPoints,
            BLOCK_ID_CHECKSUM => BlockKind::Checksum,
            _ => BlockKind::Proprietary,
        }
    }

    /// The identifier of a standard kind, or `None` for [`BlockKind::Proprietary`].
    pub fn identifier(&self) -> Option<&'static str> {
        match self {
            BlockKind::Map => Some(BLOCK_ID_MAP),
            BlockKind::GeneralParameters => Some(BLOCK_ID_GENPARAMS),
            BlockKind::SupplierParameters => Some(BLOCK_ID_SUPPARAMS),
            BlockKind::FixedParameters => Some(BLOCK_ID_FXDPARAMS),
            BlockKind::KeyEvents => Some(BLOCK_ID_KEYEVENTS),
            BlockKind::LinkParameters => Some(BLOCK_ID_LNKPARAMS),
            BlockKind::DataPoints => Some(BLOCK_ID_DATAPTS),
            BlockKind::Checksum => Some(BLOCK_ID_CHECKSUM),
            BlockKind::Proprietary => None,
        }
    }
}

impl core::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.identifier().unwrap_or("proprietary"))
    }
}
