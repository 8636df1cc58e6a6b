//! Data Points Block (DataPts) - the sampled backscatter trace.
//!
//! Samples are unsigned 16-bit values grouped by scale factor. A sample `s`
//! in a group with scale factor `sf` corresponds to `-(65535 - s) / sf` dB
//! below full scale; see [`crate::analysis::Trace`].

use crate::{
    Result,
    blocks::common::{
        BlockBuilder, BlockParse, BlockWrite, ByteCursor, checked_count, validate_count,
    },
};
use alloc::vec::Vec;

/// Samples sharing one scale factor.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataPointsAtScaleFactor {
    pub n_points: i32,
    /// Divisor applied to raw samples; typically 1000.
    pub scale_factor: i16,
    pub data: Vec<u16>,
}

impl DataPointsAtScaleFactor {
    fn parse(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let n_points = cursor.read_i32()?;
        let scale_factor = cursor.read_i16()?;
        let n = checked_count(i64::from(n_points), "n_points")?;
        let mut data = Vec::with_capacity(cursor.capacity_for(n, 2));
        for _ in 0..n {
            data.push(cursor.read_u16()?);
        }
        Ok(Self {
            n_points,
            scale_factor,
            data,
        })
    }

    fn write(&self, builder: &mut BlockBuilder) -> Result<()> {
        validate_count(i64::from(self.n_points), self.data.len(), "n_points")?;
        builder.write_i32(self.n_points);
        builder.write_i16(self.scale_factor);
        for &sample in &self.data {
            builder.write_u16(sample);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataPoints {
    pub number_of_data_points: i32,
    pub total_number_scale_factors_used: i16,
    pub scale_factors: Vec<DataPointsAtScaleFactor>,
}

impl BlockParse for DataPoints {
    const ID: &'static str = "DataPts";

    fn parse_body(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let number_of_data_points = cursor.read_i32()?;
        let total_number_scale_factors_used = cursor.read_i16()?;
        let n = checked_count(
            i64::from(total_number_scale_factors_used),
            "total_number_scale_factors_used",
        )?;
        // Each group needs at least its count and scale factor.
        let mut scale_factors = Vec::with_capacity(cursor.capacity_for(n, 6));
        for _ in 0..n {
            scale_factors.push(DataPointsAtScaleFactor::parse(cursor)?);
        }
        Ok(Self {
            number_of_data_points,
            total_number_scale_factors_used,
            scale_factors,
        })
    }
}

impl BlockWrite for DataPoints {
    const ID: &'static str = "DataPts";

    fn write_body(&self, builder: &mut BlockBuilder) -> Result<()> {
        validate_count(
            i64::from(self.total_number_scale_factors_used),
            self.scale_factors.len(),
            "total_number_scale_factors_used",
        )?;
        builder.write_i32(self.number_of_data_points);
        builder.write_i16(self.total_number_scale_factors_used);
        for group in &self.scale_factors {
            group.write(builder)?;
        }
        Ok(())
    }
}
