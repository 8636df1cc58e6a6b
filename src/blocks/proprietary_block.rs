use crate::{
    Result,
    blocks::common::{BlockBuilder, ByteCursor},
};
use alloc::string::String;
use alloc::vec::Vec;

/// A vendor block the crate does not understand, kept byte for byte.
///
/// `identifier` is the name the Map lists the block under. The header is the
/// block's own leading NUL-terminated string, which vendors do not always
/// keep equal to the identifier; `data` is everything after it up to the end
/// of the block's range in the Map.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProprietaryBlock {
    pub identifier: String,
    pub header: String,
    pub data: Vec<u8>,
}

impl ProprietaryBlock {
    /// Decode the block listed in the Map as `identifier`.
    pub fn from_bytes(identifier: &str, bytes: &[u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(bytes);
        let header = cursor.read_nul_str()?;
        let data = cursor.take_rest().to_vec();
        Ok(Self {
            identifier: String::from(identifier),
            header,
            data,
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut builder = BlockBuilder::with_capacity(self.header.len() + 1 + self.data.len());
        builder.write_header(&self.header)?;
        builder.write_bytes(&self.data);
        Ok(builder.into_inner())
    }
}
