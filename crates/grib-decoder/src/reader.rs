//! Message-level GRIB2 reading.
//!
//! [`MessageScanner`] walks a byte buffer message by message; each message's
//! sections are assembled into a [`GribMessage`] ready for decoding.

use bytes::Bytes;
use tracing::debug;

use crate::error::{GribError, Result};
use crate::sections::{
    self, DataRepresentation, GridDefinition, Identification, Indicator, ProductDefinition,
};
use crate::tables;
use crate::unpacking;

/// One decoded-metadata GRIB2 message with its still-packed data.
#[derive(Debug, Clone)]
pub struct GribMessage {
    pub indicator: Indicator,
    pub identification: Identification,
    pub grid_definition: GridDefinition,
    pub product_definition: ProductDefinition,
    pub data_representation: DataRepresentation,
    pub bitmap: Option<Vec<u8>>,
    pub packed_data: Vec<u8>,
}

impl GribMessage {
    /// Parameter short name from the code tables, or `P{d}_{c}_{n}` when
    /// the triple is not in the table.
    pub fn parameter(&self) -> String {
        let d = self.indicator.discipline;
        let c = self.product_definition.parameter_category;
        let n = self.product_definition.parameter_number;
        tables::short_name(d, c, n)
            .map(str::to_string)
            .unwrap_or_else(|| tables::coded_name(d, c, n))
    }

    /// Native units of the parameter, when the code tables know them.
    pub fn units(&self) -> Option<&'static str> {
        tables::native_units(
            self.indicator.discipline,
            self.product_definition.parameter_category,
            self.product_definition.parameter_number,
        )
    }

    /// Level descriptor text, e.g. `500 mb` or `surface`.
    pub fn level_descriptor(&self) -> String {
        tables::level_descriptor(
            self.product_definition.level_type,
            self.product_definition.level_value,
        )
    }

    /// Grid dimensions as (rows, columns).
    pub fn grid_dims(&self) -> (usize, usize) {
        (self.grid_definition.nj, self.grid_definition.ni)
    }

    /// Unpack the data into a dense plane, masked points as NaN.
    pub fn decode_values(&self) -> Result<Vec<f32>> {
        unpacking::unpack_to_plane(
            &self.data_representation,
            &self.packed_data,
            self.bitmap.as_deref(),
        )
    }
}

/// Walks GRIB2 messages in a buffer.
pub struct MessageScanner {
    data: Bytes,
    offset: usize,
}

impl MessageScanner {
    pub fn new(data: Bytes) -> Self {
        Self { data, offset: 0 }
    }

    /// Parse the next message, or `None` at end of buffer.
    pub fn next_message(&mut self) -> Result<Option<GribMessage>> {
        if self.offset >= self.data.len() {
            return Ok(None);
        }

        let remaining = &self.data[self.offset..];
        let indicator = sections::parse_indicator(remaining)?;
        let total = indicator.message_length as usize;
        if total < 20 || self.offset + total > self.data.len() {
            return Err(GribError::InvalidFormat(format!(
                "message length {total} exceeds remaining {} bytes",
                self.data.len() - self.offset
            )));
        }

        let message = &remaining[..total];
        let parsed = parse_message(indicator, message)?;
        self.offset += total;

        debug!(
            parameter = %parsed.parameter(),
            level = %parsed.level_descriptor(),
            "parsed GRIB2 message"
        );

        Ok(Some(parsed))
    }
}

/// Assemble a message from its section bytes.
fn parse_message(indicator: Indicator, message: &[u8]) -> Result<GribMessage> {
    let mut identification = None;
    let mut grid_definition = None;
    let mut product_definition = None;
    let mut data_representation = None;
    let mut bitmap = None;
    let mut packed_data = None;

    let mut offset = 16;
    while offset + 5 <= message.len() {
        if &message[offset..offset + 4] == b"7777" {
            break;
        }

        let length = u32::from_be_bytes([
            message[offset],
            message[offset + 1],
            message[offset + 2],
            message[offset + 3],
        ]) as usize;
        let number = message[offset + 4];

        if length < 5 || offset + length > message.len() {
            return Err(GribError::invalid_section(number, "bad section length"));
        }
        let section = &message[offset..offset + length];

        match number {
            1 => identification = Some(sections::parse_identification(section)?),
            2 => {} // local use, skipped
            3 => grid_definition = Some(sections::parse_grid_definition(section)?),
            4 => product_definition = Some(sections::parse_product_definition(section)?),
            5 => data_representation = Some(sections::parse_data_representation(section)?),
            6 => bitmap = sections::parse_bitmap(section)?,
            7 => packed_data = Some(sections::parse_data_section(section)?),
            other => {
                return Err(GribError::invalid_section(other, "unexpected section"));
            }
        }

        offset += length;
    }

    let missing = |section: u8| GribError::invalid_section(section, "missing from message");

    Ok(GribMessage {
        indicator,
        identification: identification.ok_or_else(|| missing(1))?,
        grid_definition: grid_definition.ok_or_else(|| missing(3))?,
        product_definition: product_definition.ok_or_else(|| missing(4))?,
        data_representation: data_representation.ok_or_else(|| missing(5))?,
        bitmap,
        packed_data: packed_data.ok_or_else(|| missing(7))?,
    })
}
