//! Key Events Block (KeyEvents) - events found by the instrument's own analysis.
//!
//! The block stores `number_of_key_events - 1` ordinary records followed by a
//! final record that also carries the end-to-end loss and optical return loss
//! summaries for the whole link.

use crate::{
    Error, Result,
    blocks::common::{BlockBuilder, BlockParse, BlockWrite, ByteCursor, validate_count},
};
use alloc::string::String;
use alloc::vec::Vec;

/// Width of the event code field.
const EVENT_CODE_LEN: usize = 6;

/// Smallest possible encoded [`KeyEvent`]: every fixed field plus an empty comment.
const MIN_KEY_EVENT_LEN: usize = 2 + 4 + 2 + 2 + 4 + EVENT_CODE_LEN + 2 + 5 * 4 + 1;

/// One event detected along the fiber.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeyEvent {
    pub event_number: i16,
    /// Round-trip time to the event, in 100 ps units.
    pub event_propagation_time: i32,
    pub attenuation_coefficient_lead_in_fiber: i16,
    pub event_loss: i16,
    pub event_reflectance: i32,
    /// Six-character event code, e.g. `"1F9999"`.
    pub event_code: String,
    pub loss_measurement_technique: String,
    pub marker_location_1: i32,
    pub marker_location_2: i32,
    pub marker_location_3: i32,
    pub marker_location_4: i32,
    pub marker_location_5: i32,
    pub comment: String,
}

impl KeyEvent {
    pub(crate) fn parse(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        Ok(Self {
            event_number: cursor.read_i16()?,
            event_propagation_time: cursor.read_i32()?,
            attenuation_coefficient_lead_in_fiber: cursor.read_i16()?,
            event_loss: cursor.read_i16()?,
            event_reflectance: cursor.read_i32()?,
            event_code: cursor.read_fixed_str(EVENT_CODE_LEN)?,
            loss_measurement_technique: cursor.read_fixed_str(2)?,
            marker_location_1: cursor.read_i32()?,
            marker_location_2: cursor.read_i32()?,
            marker_location_3: cursor.read_i32()?,
            marker_location_4: cursor.read_i32()?,
            marker_location_5: cursor.read_i32()?,
            comment: cursor.read_nul_str()?,
        })
    }

    pub(crate) fn write(&self, builder: &mut BlockBuilder) -> Result<()> {
        builder.write_i16(self.event_number);
        builder.write_i32(self.event_propagation_time);
        builder.write_i16(self.attenuation_coefficient_lead_in_fiber);
        builder.write_i16(self.event_loss);
        builder.write_i32(self.event_reflectance);
        builder.write_fixed_str("event_code", &self.event_code, EVENT_CODE_LEN)?;
        builder.write_fixed_str(
            "loss_measurement_technique",
            &self.loss_measurement_technique,
            2,
        )?;
        builder.write_i32(self.marker_location_1);
        builder.write_i32(self.marker_location_2);
        builder.write_i32(self.marker_location_3);
        builder.write_i32(self.marker_location_4);
        builder.write_i32(self.marker_location_5);
        builder.write_nul_str("comment", &self.comment)?;
        Ok(())
    }
}

/// The final key event, which closes the list with link-wide loss figures.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LastKeyEvent {
    /// Fields shared with every other key event.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub event: KeyEvent,
    pub end_to_end_loss: i32,
    pub end_to_end_marker_position_1: i32,
    pub end_to_end_marker_position_2: i32,
    pub optical_return_loss: u16,
    pub optical_return_loss_marker_position_1: i32,
    pub optical_return_loss_marker_position_2: i32,
}

impl LastKeyEvent {
    fn parse(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        Ok(Self {
            event: KeyEvent::parse(cursor)?,
            end_to_end_loss: cursor.read_i32()?,
            end_to_end_marker_position_1: cursor.read_i32()?,
            end_to_end_marker_position_2: cursor.read_i32()?,
            optical_return_loss: cursor.read_u16()?,
            optical_return_loss_marker_position_1: cursor.read_i32()?,
            optical_return_loss_marker_position_2: cursor.read_i32()?,
        })
    }

    fn write(&self, builder: &mut BlockBuilder) -> Result<()> {
        self.event.write(builder)?;
        builder.write_i32(self.end_to_end_loss);
        builder.write_i32(self.end_to_end_marker_position_1);
        builder.write_i32(self.end_to_end_marker_position_2);
        builder.write_u16(self.optical_return_loss);
        builder.write_i32(self.optical_return_loss_marker_position_1);
        builder.write_i32(self.optical_return_loss_marker_position_2);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeyEvents {
    /// Number of events including the last one; always at least 1.
    pub number_of_key_events: i16,
    pub key_events: Vec<KeyEvent>,
    pub last_key_event: LastKeyEvent,
}

impl BlockParse for KeyEvents {
    const ID: &'static str = "KeyEvents";

    fn parse_body(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let number_of_key_events = cursor.read_i16()?;
        if number_of_key_events < 1 {
            return Err(Error::InvalidCount {
                field: "number_of_key_events",
                value: i64::from(number_of_key_events),
            });
        }
        let n = number_of_key_events as usize - 1;

        let mut key_events = Vec::with_capacity(cursor.capacity_for(n, MIN_KEY_EVENT_LEN));
        for _ in 0..n {
            key_events.push(KeyEvent::parse(cursor)?);
        }
        let last_key_event = LastKeyEvent::parse(cursor)?;

        Ok(Self {
            number_of_key_events,
            key_events,
            last_key_event,
        })
    }
}

impl BlockWrite for KeyEvents {
    const ID: &'static str = "KeyEvents";

    fn write_body(&self, builder: &mut BlockBuilder) -> Result<()> {
        validate_count(
            i64::from(self.number_of_key_events) - 1,
            self.key_events.len(),
            "number_of_key_events",
        )?;
        builder.write_i16(self.number_of_key_events);
        for event in &self.key_events {
            event.write(builder)?;
        }
        self.last_key_event.write(builder)
    }
}

impl KeyEvents {
    /// Iterate over every event, including the shared fields of the last one.
    pub fn iter(&self) -> impl Iterator<Item = &KeyEvent> {
        self.key_events
            .iter()
            .chain(core::iter::once(&self.last_key_event.event))
    }
}
