//! Link Parameters Block (LnkParams) - landmarks along the fiber route.
//!
//! The codec is complete, but [`crate::SorFile::from_bytes`] does
//! not dispatch to it: no sample files with landmark data have been available
//! to confirm the record layout, so `link_parameters` is always `None` after a
//! whole-file decode. Callers that trust the layout can decode the block
//! explicitly with [`crate::blocks::BlockParse::from_bytes`] on the bytes
//! returned by [`crate::blocks::MapBlock::extract`].

use crate::{
    Result,
    blocks::common::{
        BlockBuilder, BlockParse, BlockWrite, ByteCursor, checked_count, validate_count,
    },
};
use alloc::string::String;
use alloc::vec::Vec;

/// Smallest possible encoded [`Landmark`].
const MIN_LANDMARK_LEN: usize = 2 + 2 + 4 + 2 + 4 + 4 + 2 + 4 + 4 + 2 + 2 + 1;

/// A labelled physical location on the route.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Landmark {
    pub landmark_number: i16,
    pub landmark_code: String,
    pub landmark_location: i32,
    pub related_event_number: i16,
    pub gps_longitude: i32,
    pub gps_latitude: i32,
    pub fiber_correction_factor_lead_in_fiber: i16,
    pub sheath_marker_entering_landmark: i32,
    pub sheath_marker_leaving_landmark: i32,
    pub units_of_sheath_marks_leaving_landmark: String,
    pub mode_field_diameter_leaving_landmark: i16,
    pub comment: String,
}

impl Landmark {
    pub(crate) fn parse(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        Ok(Self {
            landmark_number: cursor.read_i16()?,
            landmark_code: cursor.read_fixed_str(2)?,
            landmark_location: cursor.read_i32()?,
            related_event_number: cursor.read_i16()?,
            gps_longitude: cursor.read_i32()?,
            gps_latitude: cursor.read_i32()?,
            fiber_correction_factor_lead_in_fiber: cursor.read_i16()?,
            sheath_marker_entering_landmark: cursor.read_i32()?,
            sheath_marker_leaving_landmark: cursor.read_i32()?,
            units_of_sheath_marks_leaving_landmark: cursor.read_fixed_str(2)?,
            mode_field_diameter_leaving_landmark: cursor.read_i16()?,
            comment: cursor.read_nul_str()?,
        })
    }

    pub(crate) fn write(&self, builder: &mut BlockBuilder) -> Result<()> {
        builder.write_i16(self.landmark_number);
        builder.write_fixed_str("landmark_code", &self.landmark_code, 2)?;
        builder.write_i32(self.landmark_location);
        builder.write_i16(self.related_event_number);
        builder.write_i32(self.gps_longitude);
        builder.write_i32(self.gps_latitude);
        builder.write_i16(self.fiber_correction_factor_lead_in_fiber);
        builder.write_i32(self.sheath_marker_entering_landmark);
        builder.write_i32(self.sheath_marker_leaving_landmark);
        builder.write_fixed_str(
            "units_of_sheath_marks_leaving_landmark",
            &self.units_of_sheath_marks_leaving_landmark,
            2,
        )?;
        builder.write_i16(self.mode_field_diameter_leaving_landmark);
        builder.write_nul_str("comment", &self.comment)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkParameters {
    pub number_of_landmarks: i16,
    pub landmarks: Vec<Landmark>,
}

impl BlockParse for LinkParameters {
    const ID: &'static str = "LnkParams";

    fn parse_body(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let number_of_landmarks = cursor.read_i16()?;
        let n = checked_count(i64::from(number_of_landmarks), "number_of_landmarks")?;
        let mut landmarks = Vec::with_capacity(cursor.capacity_for(n, MIN_LANDMARK_LEN));
        for _ in 0..n {
            landmarks.push(Landmark::parse(cursor)?);
        }
        Ok(Self {
            number_of_landmarks,
            landmarks,
        })
    }
}

impl BlockWrite for LinkParameters {
    const ID: &'static str = "LnkParams";

    fn write_body(&self, builder: &mut BlockBuilder) -> Result<()> {
        validate_count(
            i64::from(self.number_of_landmarks),
            self.landmarks.len(),
            "number_of_landmarks",
        )?;
        builder.write_i16(self.number_of_landmarks);
        for landmark in &self.landmarks {
            landmark.write(builder)?;
        }
        Ok(())
    }
}
