//! GRIB2 section parsing.
//!
//! A GRIB2 message is a 16-byte indicator followed by numbered sections,
//! each carrying a 4-byte length and a 1-byte section number. The parsers
//! here each take one section's bytes (starting at its length header);
//! walking the sections of a message is the reader's job.

use crate::error::{GribError, Result};
use chrono::{DateTime, NaiveDate, Utc};

/// Section 0: indicator.
#[derive(Debug, Clone, Copy)]
pub struct Indicator {
    pub discipline: u8,
    pub edition: u8,
    /// Total message length in bytes, including this section.
    pub message_length: u64,
}

/// Section 1: identification.
#[derive(Debug, Clone)]
pub struct Identification {
    pub center: u16,
    pub sub_center: u16,
    pub table_version: u8,
    pub reference_time: DateTime<Utc>,
    pub production_status: u8,
    pub data_type: u8,
}

/// Section 3: grid definition (template 3.0, regular lat/lon).
#[derive(Debug, Clone)]
pub struct GridDefinition {
    pub template: u16,
    /// Points along a parallel (columns).
    pub ni: usize,
    /// Points along a meridian (rows).
    pub nj: usize,
    /// First grid point, degrees.
    pub first_lat: f64,
    pub first_lon: f64,
    /// Last grid point, degrees.
    pub last_lat: f64,
    pub last_lon: f64,
    pub scanning_mode: u8,
}

impl GridDefinition {
    /// Latitude of each row, first to last.
    pub fn latitudes(&self) -> Vec<f64> {
        axis_points(self.first_lat, self.last_lat, self.nj)
    }

    /// Longitude of each column, first to last.
    pub fn longitudes(&self) -> Vec<f64> {
        axis_points(self.first_lon, self.last_lon, self.ni)
    }

    /// Total number of grid points.
    pub fn num_points(&self) -> usize {
        self.ni * self.nj
    }
}

fn axis_points(first: f64, last: f64, n: usize) -> Vec<f64> {
    if n <= 1 {
        return vec![first];
    }
    let step = (last - first) / (n - 1) as f64;
    (0..n).map(|i| first + step * i as f64).collect()
}

/// Section 4: product definition (template 4.0).
#[derive(Debug, Clone)]
pub struct ProductDefinition {
    pub template: u16,
    pub parameter_category: u8,
    pub parameter_number: u8,
    pub forecast_hour: u32,
    /// Type of first fixed surface (code table 4.5).
    pub level_type: u8,
    /// Value of the first fixed surface with its scale factor applied.
    pub level_value: f64,
}

/// Section 5: data representation (template 5.0, simple packing).
#[derive(Debug, Clone)]
pub struct DataRepresentation {
    pub template: u16,
    pub num_data_points: u32,
    pub reference_value: f32,
    pub binary_scale_factor: i16,
    pub decimal_scale_factor: i16,
    pub bits_per_value: u8,
}

/// Parse the 16-byte indicator at the start of a message.
pub fn parse_indicator(data: &[u8]) -> Result<Indicator> {
    if data.len() < 16 {
        return Err(GribError::InvalidFormat(
            "truncated indicator section".to_string(),
        ));
    }
    if &data[0..4] != b"GRIB" {
        return Err(GribError::InvalidFormat("missing GRIB magic".to_string()));
    }

    let discipline = data[6];
    let edition = data[7];
    if edition != 2 {
        return Err(GribError::InvalidFormat(format!(
            "unsupported GRIB edition {edition}"
        )));
    }

    let message_length = u64::from_be_bytes([
        data[8], data[9], data[10], data[11], data[12], data[13], data[14], data[15],
    ]);

    Ok(Indicator {
        discipline,
        edition,
        message_length,
    })
}

/// Parse section 1 from its section bytes.
pub fn parse_identification(section: &[u8]) -> Result<Identification> {
    // 5-byte header + 16 bytes of fixed octets
    if section.len() < 21 {
        return Err(GribError::invalid_section(1, "truncated"));
    }
    let body = &section[5..];

    let center = u16::from_be_bytes([body[0], body[1]]);
    let sub_center = u16::from_be_bytes([body[2], body[3]]);
    let table_version = body[4];

    let year = u16::from_be_bytes([body[7], body[8]]);
    let month = body[9];
    let day = body[10];
    let hour = body[11];
    let minute = body[12];
    let second = body[13];

    let reference_time = NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32)
        .and_then(|d| d.and_hms_opt(hour as u32, minute as u32, second as u32))
        .map(|naive| DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
        .ok_or_else(|| {
            GribError::invalid_section(
                1,
                format!("invalid reference time {year}-{month:02}-{day:02} {hour:02}:{minute:02}"),
            )
        })?;

    Ok(Identification {
        center,
        sub_center,
        table_version,
        reference_time,
        production_status: body.get(14).copied().unwrap_or(0),
        data_type: body.get(15).copied().unwrap_or(0),
    })
}

/// Parse section 3 from its section bytes.
pub fn parse_grid_definition(section: &[u8]) -> Result<GridDefinition> {
    if section.len() < 14 {
        return Err(GribError::invalid_section(3, "truncated"));
    }

    let template = u16::from_be_bytes([section[12], section[13]]);
    let tmpl = &section[14..];

    if template != 0 {
        // Only the dimensions are extracted for non-lat/lon templates; the
        // Ni/Nj octets sit at the same offsets in templates 0, 1 and 40.
        let (ni, nj) = if tmpl.len() >= 24 {
            (
                u32::from_be_bytes([tmpl[16], tmpl[17], tmpl[18], tmpl[19]]) as usize,
                u32::from_be_bytes([tmpl[20], tmpl[21], tmpl[22], tmpl[23]]) as usize,
            )
        } else {
            (0, 0)
        };
        return Ok(GridDefinition {
            template,
            ni,
            nj,
            first_lat: 0.0,
            first_lon: 0.0,
            last_lat: 0.0,
            last_lon: 0.0,
            scanning_mode: 0,
        });
    }

    // Template 3.0 layout, offsets relative to the template bytes:
    //   16..20  Ni, 20..24 Nj
    //   32..36  La1, 36..40 Lo1 (microdegrees)
    //   41..45  La2, 45..49 Lo2 (microdegrees)
    //   57      scanning mode
    if tmpl.len() < 58 {
        return Err(GribError::invalid_section(
            3,
            format!("template 3.0 needs 58 bytes, got {}", tmpl.len()),
        ));
    }

    let ni = u32::from_be_bytes([tmpl[16], tmpl[17], tmpl[18], tmpl[19]]) as usize;
    let nj = u32::from_be_bytes([tmpl[20], tmpl[21], tmpl[22], tmpl[23]]) as usize;
    let la1 = i32::from_be_bytes([tmpl[32], tmpl[33], tmpl[34], tmpl[35]]);
    let lo1 = i32::from_be_bytes([tmpl[36], tmpl[37], tmpl[38], tmpl[39]]);
    let la2 = i32::from_be_bytes([tmpl[41], tmpl[42], tmpl[43], tmpl[44]]);
    let lo2 = i32::from_be_bytes([tmpl[45], tmpl[46], tmpl[47], tmpl[48]]);

    const MICRO: f64 = 1e-6;
    Ok(GridDefinition {
        template,
        ni,
        nj,
        first_lat: la1 as f64 * MICRO,
        first_lon: lo1 as f64 * MICRO,
        last_lat: la2 as f64 * MICRO,
        last_lon: lo2 as f64 * MICRO,
        scanning_mode: tmpl[57],
    })
}

/// Parse section 4 from its section bytes.
pub fn parse_product_definition(section: &[u8]) -> Result<ProductDefinition> {
    if section.len() < 28 {
        return Err(GribError::invalid_section(4, "truncated"));
    }

    let template = u16::from_be_bytes([section[7], section[8]]);
    let parameter_category = section[9];
    let parameter_number = section[10];

    // Template 4.0: octet 18 is the time-range unit, 18..22 the forecast
    // time, 22 the first-surface type, 23 its scale factor, 24..28 its
    // scaled value.
    let forecast_hour =
        u32::from_be_bytes([section[18], section[19], section[20], section[21]]);
    let level_type = section[22];
    let scale_factor = section[23] as i8;
    let scaled_value = u32::from_be_bytes([section[24], section[25], section[26], section[27]]);

    let level_value = scaled_value as f64 / 10f64.powi(scale_factor as i32);

    Ok(ProductDefinition {
        template,
        parameter_category,
        parameter_number,
        forecast_hour,
        level_type,
        level_value,
    })
}

/// Parse section 5 from its section bytes.
pub fn parse_data_representation(section: &[u8]) -> Result<DataRepresentation> {
    if section.len() < 21 {
        return Err(GribError::invalid_section(5, "truncated"));
    }

    let num_data_points = u32::from_be_bytes([section[5], section[6], section[7], section[8]]);
    let template = u16::from_be_bytes([section[9], section[10]]);

    // Template 5.0 fields follow at octet 11.
    let reference_value =
        f32::from_be_bytes([section[11], section[12], section[13], section[14]]);
    let binary_scale_factor = i16::from_be_bytes([section[15], section[16]]);
    let decimal_scale_factor = i16::from_be_bytes([section[17], section[18]]);
    let bits_per_value = section[19];

    Ok(DataRepresentation {
        template,
        num_data_points,
        reference_value,
        binary_scale_factor,
        decimal_scale_factor,
        bits_per_value,
    })
}

/// Parse section 6, returning the bitmap bytes when one is present.
pub fn parse_bitmap(section: &[u8]) -> Result<Option<Vec<u8>>> {
    if section.len() < 6 {
        return Err(GribError::invalid_section(6, "truncated"));
    }
    match section[5] {
        255 => Ok(None),
        0 => Ok(Some(section[6..].to_vec())),
        other => Err(GribError::invalid_section(
            6,
            format!("predefined bitmap {other} not supported"),
        )),
    }
}

/// Parse section 7, returning the packed data bytes.
pub fn parse_data_section(section: &[u8]) -> Result<Vec<u8>> {
    if section.len() < 5 {
        return Err(GribError::invalid_section(7, "truncated"));
    }
    Ok(section[5..].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indicator_rejects_bad_magic() {
        let data = [0u8; 16];
        assert!(parse_indicator(&data).is_err());
    }

    #[test]
    fn test_indicator_rejects_grib1() {
        let mut data = [0u8; 16];
        data[0..4].copy_from_slice(b"GRIB");
        data[7] = 1;
        assert!(parse_indicator(&data).is_err());
    }

    #[test]
    fn test_axis_points_descending() {
        let pts = axis_points(45.0, 35.0, 11);
        assert_eq!(pts.len(), 11);
        assert_eq!(pts[0], 45.0);
        assert_eq!(pts[10], 35.0);
        assert!((pts[1] - 44.0).abs() < 1e-9);
    }

    #[test]
    fn test_axis_points_single() {
        assert_eq!(axis_points(10.0, 10.0, 1), vec![10.0]);
    }
}
