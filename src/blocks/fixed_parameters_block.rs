//! Fixed Parameters Block (FxdParams) - acquisition settings of the trace.
//!
//! Besides scalar settings, the block carries one entry per pulse width used
//! in the acquisition. On the wire these are three consecutive arrays (all
//! pulse widths, then all data spacings, then all point counts), each sized by
//! `total_n_pulse_widths_used`.

use crate::{
    Result,
    blocks::common::{
        BlockBuilder, BlockParse, BlockWrite, ByteCursor, checked_count, validate_count,
    },
};
use alloc::string::String;
use alloc::vec::Vec;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FixedParametersBlock {
    /// Acquisition time as seconds since the Unix epoch.
    pub date_time_stamp: u32,
    /// Two-letter distance unit, e.g. `"mt"` or `"km"`.
    pub units_of_distance: String,
    /// Actual wavelength in 0.1 nm.
    pub actual_wavelength: i16,
    pub acquisition_offset: i32,
    pub acquisition_offset_distance: i32,
    pub total_n_pulse_widths_used: i16,
    /// Pulse widths in ns.
    pub pulse_widths_used: Vec<i16>,
    /// Time taken to acquire 10,000 data points, in 100 ps units.
    pub data_spacing: Vec<i32>,
    pub n_data_points_for_pulse_widths_used: Vec<i32>,
    /// Group index multiplied by 100,000 (e.g. 146800 for 1.468).
    pub group_index: i32,
    pub backscatter_coefficient: i16,
    pub number_of_averages: i32,
    pub averaging_time: u16,
    pub acquisition_range: i32,
    pub acquisition_range_distance: i32,
    /// Time from the OTDR's internal reference to its front panel, in 100 ps units.
    pub front_panel_offset: i32,
    pub noise_floor_level: u16,
    pub noise_floor_scale_factor: i16,
    pub power_offset_first_point: u16,
    pub loss_threshold: u16,
    pub reflectance_threshold: u16,
    pub end_of_fibre_threshold: u16,
    pub trace_type: String,
    pub window_coordinate_1: i32,
    pub window_coordinate_2: i32,
    pub window_coordinate_3: i32,
    pub window_coordinate_4: i32,
}

impl BlockParse for FixedParametersBlock {
    const ID: &'static str = "FxdParams";

    fn parse_body(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let date_time_stamp = cursor.read_u32()?;
        let units_of_distance = cursor.read_fixed_str(2)?;
        let actual_wavelength = cursor.read_i16()?;
        let acquisition_offset = cursor.read_i32()?;
        let acquisition_offset_distance = cursor.read_i32()?;
        let total_n_pulse_widths_used = cursor.read_i16()?;
        let n = checked_count(
            i64::from(total_n_pulse_widths_used),
            "total_n_pulse_widths_used",
        )?;

        let mut pulse_widths_used = Vec::with_capacity(cursor.capacity_for(n, 2));
        for _ in 0..n {
            pulse_widths_used.push(cursor.read_i16()?);
        }
        let mut data_spacing = Vec::with_capacity(cursor.capacity_for(n, 4));
        for _ in 0..n {
            data_spacing.push(cursor.read_i32()?);
        }
        let mut n_data_points_for_pulse_widths_used = Vec::with_capacity(cursor.capacity_for(n, 4));
        for _ in 0..n {
            n_data_points_for_pulse_widths_used.push(cursor.read_i32()?);
        }

        Ok(Self {
            date_time_stamp,
            units_of_distance,
            actual_wavelength,
            acquisition_offset,
            acquisition_offset_distance,
            total_n_pulse_widths_used,
            pulse_widths_used,
            data_spacing,
            n_data_points_for_pulse_widths_used,
            group_index: cursor.read_i32()?,
            backscatter_coefficient: cursor.read_i16()?,
            number_of_averages: cursor.read_i32()?,
            averaging_time: cursor.read_u16()?,
            acquisition_range: cursor.read_i32()?,
            acquisition_range_distance: cursor.read_i32()?,
            front_panel_offset: cursor.read_i32()?,
            noise_floor_level: cursor.read_u16()?,
            noise_floor_scale_factor: cursor.read_i16()?,
            power_offset_first_point: cursor.read_u16()?,
            loss_threshold: cursor.read_u16()?,
            reflectance_threshold: cursor.read_u16()?,
            end_of_fibre_threshold: cursor.read_u16()?,
            trace_type: cursor.read_fixed_str(2)?,
            window_coordinate_1: cursor.read_i32()?,
            window_coordinate_2: cursor.read_i32()?,
            window_coordinate_3: cursor.read_i32()?,
            window_coordinate_4: cursor.read_i32()?,
        })
    }
}

impl BlockWrite for FixedParametersBlock {
    const ID: &'static str = "FxdParams";

    fn write_body(&self, builder: &mut BlockBuilder) -> Result<()> {
        let declared = i64::from(self.total_n_pulse_widths_used);
        validate_count(declared, self.pulse_widths_used.len(), "total_n_pulse_widths_used")?;
        validate_count(declared, self.data_spacing.len(), "total_n_pulse_widths_used")?;
        validate_count(
            declared,
            self.n_data_points_for_pulse_widths_used.len(),
            "total_n_pulse_widths_used",
        )?;

        builder.write_u32(self.date_time_stamp);
        builder.write_fixed_str("units_of_distance", &self.units_of_distance, 2)?;
        builder.write_i16(self.actual_wavelength);
        builder.write_i32(self.acquisition_offset);
        builder.write_i32(self.acquisition_offset_distance);
        builder.write_i16(self.total_n_pulse_widths_used);
        for &width in &self.pulse_widths_used {
            builder.write_i16(width);
        }
        for &spacing in &self.data_spacing {
            builder.write_i32(spacing);
        }
        for &points in &self.n_data_points_for_pulse_widths_used {
            builder.write_i32(points);
        }
        builder.write_i32(self.group_index);
        builder.write_i16(self.backscatter_coefficient);
        builder.write_i32(self.number_of_averages);
        builder.write_u16(self.averaging_time);
        builder.write_i32(self.acquisition_range);
        builder.write_i32(self.acquisition_range_distance);
        builder.write_i32(self.front_panel_offset);
        builder.write_u16(self.noise_floor_level);
        builder.write_i16(self.noise_floor_scale_factor);
        builder.write_u16(self.power_offset_first_point);
        builder.write_u16(self.loss_threshold);
        builder.write_u16(self.reflectance_threshold);
        builder.write_u16(self.end_of_fibre_threshold);
        builder.write_fixed_str("trace_type", &self.trace_type, 2)?;
        builder.write_i32(self.window_coordinate_1);
        builder.write_i32(self.window_coordinate_2);
        builder.write_i32(self.window_coordinate_3);
        builder.write_i32(self.window_coordinate_4);
        Ok(())
    }
}

impl FixedParametersBlock {
    /// Refractive index of the fiber as configured on the instrument.
    pub fn refractive_index(&self) -> f64 {
        f64::from(self.group_index) / 100_000.0
    }
}
