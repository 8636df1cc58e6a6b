//! General Parameters Block (GenParams) - cable, fiber and operator details.

use crate::{
    Result,
    blocks::common::{BlockBuilder, BlockParse, BlockWrite, ByteCursor},
};
use alloc::string::String;

/// Descriptive information about the fiber under test.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeneralParametersBlock {
    /// Two-letter language code, e.g. `"EN"`.
    pub language_code: String,
    pub cable_id: String,
    pub fiber_id: String,
    /// ITU-T fiber type number, e.g. 652.
    pub fiber_type: i16,
    /// Nominal wavelength in nm.
    pub nominal_wavelength: i16,
    pub originating_location: String,
    pub terminating_location: String,
    pub cable_code: String,
    /// `"BC"` (as-built), `"RC"` (as-repaired), `"OT"` (other) or `"CC"` (current).
    pub current_data_flag: String,
    /// Offset from the front panel to the launch connector, in 100 ps units.
    pub user_offset: i32,
    /// The same offset expressed as a distance.
    pub user_offset_distance: i32,
    pub operator: String,
    pub comment: String,
}

impl BlockParse for GeneralParametersBlock {
    const ID: &'static str = "GenParams";

    fn parse_body(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        Ok(Self {
            language_code: cursor.read_fixed_str(2)?,
            cable_id: cursor.read_nul_str()?,
            fiber_id: cursor.read_nul_str()?,
            fiber_type: cursor.read_i16()?,
            nominal_wavelength: cursor.read_i16()?,
            originating_location: cursor.read_nul_str()?,
            terminating_location: cursor.read_nul_str()?,
            cable_code: cursor.read_nul_str()?,
            current_data_flag: cursor.read_fixed_str(2)?,
            user_offset: cursor.read_i32()?,
            user_offset_distance: cursor.read_i32()?,
            operator: cursor.read_nul_str()?,
            comment: cursor.read_nul_str()?,
        })
    }
}

impl BlockWrite for GeneralParametersBlock {
    const ID: &'static str = "GenParams";

    fn write_body(&self, builder: &mut BlockBuilder) -> Result<()> {
        builder.write_fixed_str("language_code", &self.language_code, 2)?;
        builder.write_nul_str("cable_id", &self.cable_id)?;
        builder.write_nul_str("fiber_id", &self.fiber_id)?;
        builder.write_i16(self.fiber_type);
        builder.write_i16(self.nominal_wavelength);
        builder.write_nul_str("originating_location", &self.originating_location)?;
        builder.write_nul_str("terminating_location", &self.terminating_location)?;
        builder.write_nul_str("cable_code", &self.cable_code)?;
        builder.write_fixed_str("current_data_flag", &self.current_data_flag, 2)?;
        builder.write_i32(self.user_offset);
        builder.write_i32(self.user_offset_distance);
        builder.write_nul_str("operator", &self.operator)?;
        builder.write_nul_str("comment", &self.comment)?;
        Ok(())
    }
}
