use crate::{
    Result,
    blocks::common::{BlockBuilder, BlockParse, BlockWrite, ByteCursor},
};
use alloc::string::String;

/// Supplier Parameters Block (SupParams) - identifies the OTDR that took the trace.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SupplierParametersBlock {
    pub supplier_name: String,
    pub otdr_mainframe_id: String,
    pub otdr_mainframe_sn: String,
    pub optical_module_id: String,
    pub optical_module_sn: String,
    pub software_revision: String,
    pub other: String,
}

impl BlockParse for SupplierParametersBlock {
    const ID: &'static str = "SupParams";

    fn parse_body(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        Ok(Self {
            supplier_name: cursor.read_nul_str()?,
            otdr_mainframe_id: cursor.read_nul_str()?,
            otdr_mainframe_sn: cursor.read_nul_str()?,
            optical_module_id: cursor.read_nul_str()?,
            optical_module_sn: cursor.read_nul_str()?,
            software_revision: cursor.read_nul_str()?,
            other: cursor.read_nul_str()?,
        })
    }
}

impl BlockWrite for SupplierParametersBlock {
    const ID: &'static str = "SupParams";

    fn write_body(&self, builder: &mut BlockBuilder) -> Result<()> {
        for (name, value) in [
            ("supplier_name", &self.supplier_name),
            ("otdr_mainframe_id", &self.otdr_mainframe_id),
            ("otdr_mainframe_sn", &self.otdr_mainframe_sn),
            ("optical_module_id", &self.optical_module_id),
            ("optical_module_sn", &self.optical_module_sn),
            ("software_revision", &self.software_revision),
            ("other", &self.other),
        ] {
            builder.write_nul_str(name, value)?;
        }
        Ok(())
    }
}
