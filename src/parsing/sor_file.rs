use crate::{
    Result,
    blocks::{
        BlockKind, BlockParse, DataPoints, FixedParametersBlock, GeneralParametersBlock,
        KeyEvents, LinkParameters, MapBlock, ProprietaryBlock, SupplierParametersBlock,
    },
    writer::SorWriter,
};
use alloc::vec::Vec;

/// A decoded SOR file.
///
/// Every standard block is optional: a file may omit it, and a block whose
/// directory entry points outside the file is treated as absent. Blocks the
/// crate does not recognize are kept verbatim in `proprietary_blocks`, in the
/// order the Map lists them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SorFile {
    pub map: MapBlock,
    pub general_parameters: Option<GeneralParametersBlock>,
    pub supplier_parameters: Option<SupplierParametersBlock>,
    pub fixed_parameters: Option<FixedParametersBlock>,
    pub key_events: Option<KeyEvents>,
    /// Never populated by [`SorFile::from_bytes`]; see
    /// [`crate::blocks::LinkParameters`].
    pub link_parameters: Option<LinkParameters>,
    pub data_points: Option<DataPoints>,
    pub proprietary_blocks: Vec<ProprietaryBlock>,
}

impl SorFile {
    /// Parse a SOR file from a byte buffer.
    ///
    /// # Arguments
    /// * `data` - Complete file contents.
    ///
    /// # Returns
    /// A [`SorFile`] containing every decoded block, or a format error if the
    /// Map or any recognized block is malformed. A directory entry whose byte
    /// range falls outside `data` does not fail the decode; that block is
    /// left absent.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let map = MapBlock::from_bytes(data)?;
        tracing::debug!(
            revision = map.revision_number,
            blocks = map.block_info.len(),
            "Parsed SOR map"
        );

        let mut general_parameters = None;
        let mut supplier_parameters = None;
        let mut fixed_parameters = None;
        let mut key_events = None;
        let mut data_points = None;
        let mut proprietary_blocks = Vec::new();

        for (info, range) in map.block_ranges(data.len()) {
            let identifier = info.identifier.as_str();
            let bytes = match range {
                Ok(range) => &data[range],
                Err(e) => {
                    tracing::warn!(identifier, error = %e, "Block range is invalid; treating block as absent");
                    continue;
                }
            };

            match BlockKind::from_identifier(identifier) {
                BlockKind::GeneralParameters => {
                    general_parameters = Some(GeneralParametersBlock::from_bytes(bytes)?);
                }
                BlockKind::SupplierParameters => {
                    supplier_parameters = Some(SupplierParametersBlock::from_bytes(bytes)?);
                }
                BlockKind::FixedParameters => {
                    fixed_parameters = Some(FixedParametersBlock::from_bytes(bytes)?);
                }
                BlockKind::KeyEvents => {
                    key_events = Some(KeyEvents::from_bytes(bytes)?);
                }
                BlockKind::DataPoints => {
                    data_points = Some(DataPoints::from_bytes(bytes)?);
                }
                BlockKind::LinkParameters => {
                    tracing::debug!(size = bytes.len(), "Skipping link parameters block");
                }
                BlockKind::Checksum => {
                    tracing::debug!(size = bytes.len(), "Skipping checksum block");
                }
                BlockKind::Map | BlockKind::Proprietary => {
                    proprietary_blocks.push(ProprietaryBlock::from_bytes(identifier, bytes)?);
                }
            }
            tracing::trace!(identifier, size = bytes.len(), "Decoded block");
        }

        Ok(Self {
            map,
            general_parameters,
            supplier_parameters,
            fixed_parameters,
            key_events,
            link_parameters: None,
            data_points,
            proprietary_blocks,
        })
    }

    /// Parse a SOR file from disk.
    #[cfg(feature = "std")]
    pub fn from_file(path: &str) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Encode this file against its own Map.
    ///
    /// Equivalent to `encode(self, &self.map)`; see [`SorWriter`].
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        SorWriter::new(&self.map).encode(self)
    }

    /// Encode this file and write it to `path`.
    #[cfg(feature = "std")]
    pub fn write_to_file(&self, path: &str) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Render the decoded blocks as pretty-printed JSON.
    ///
    /// Requires the `serde_json` feature.
    #[cfg(feature = "serde_json")]
    pub fn to_json(&self) -> Result<alloc::string::String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            crate::Error::SerializationError(alloc::format!("JSON serialization failed: {e}"))
        })
    }
}
