//! Unpacking of simple-packed (template 5.0) GRIB2 data.

use crate::error::{GribError, Result};
use crate::sections::DataRepresentation;

/// Unpack simple-packed data into per-point values.
///
/// Points masked out by the bitmap come back as `None`. The unpacking
/// formula is `(R + packed * 2^E) * 10^-D`.
pub fn unpack_simple(
    repr: &DataRepresentation,
    packed: &[u8],
    bitmap: Option<&[u8]>,
) -> Result<Vec<Option<f32>>> {
    let num_points = repr.num_data_points as usize;

    if repr.bits_per_value == 0 {
        // Constant field, every point is the reference value.
        return Ok(vec![Some(repr.reference_value); num_points]);
    }

    let binary_scale = 2.0_f32.powi(repr.binary_scale_factor as i32);
    let decimal_scale = 10.0_f32.powi(-(repr.decimal_scale_factor as i32));
    let bits = repr.bits_per_value as usize;

    let mut values = Vec::with_capacity(num_points);
    let mut bit_position = 0usize;

    for i in 0..num_points {
        if !bitmap_has_value(bitmap, i) {
            values.push(None);
            continue;
        }

        let raw = extract_bits(packed, bit_position, bits)
            .ok_or_else(|| GribError::Unpacking(format!("ran out of data at point {i}")))?;
        bit_position += bits;

        values.push(Some(
            (repr.reference_value + raw as f32 * binary_scale) * decimal_scale,
        ));
    }

    Ok(values)
}

/// Unpack into a dense plane, with masked points as NaN.
pub fn unpack_to_plane(
    repr: &DataRepresentation,
    packed: &[u8],
    bitmap: Option<&[u8]>,
) -> Result<Vec<f32>> {
    Ok(unpack_simple(repr, packed, bitmap)?
        .into_iter()
        .map(|v| v.unwrap_or(f32::NAN))
        .collect())
}

fn bitmap_has_value(bitmap: Option<&[u8]>, point: usize) -> bool {
    match bitmap {
        None => true,
        Some(bm) => {
            let byte = point / 8;
            let bit = 7 - (point % 8);
            bm.get(byte).map_or(true, |b| (b >> bit) & 1 == 1)
        }
    }
}

/// Read `num_bits` MSB-first from `data` starting at `start_bit`.
fn extract_bits(data: &[u8], start_bit: usize, num_bits: usize) -> Option<u32> {
    if num_bits == 0 || num_bits > 32 {
        return None;
    }

    let mut result = 0u32;
    for i in 0..num_bits {
        let absolute = start_bit + i;
        let byte = data.get(absolute / 8)?;
        let bit = (byte >> (7 - (absolute % 8))) & 1;
        result = (result << 1) | bit as u32;
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repr(num_points: u32, bits: u8, reference: f32) -> DataRepresentation {
        DataRepresentation {
            template: 0,
            num_data_points: num_points,
            reference_value: reference,
            binary_scale_factor: 0,
            decimal_scale_factor: 0,
            bits_per_value: bits,
        }
    }

    #[test]
    fn test_extract_bits_msb_first() {
        let data = [0b1011_0101u8];
        assert_eq!(extract_bits(&data, 0, 2), Some(0b10));
        assert_eq!(extract_bits(&data, 2, 2), Some(0b11));
        assert_eq!(extract_bits(&data, 0, 8), Some(0b1011_0101));
        assert_eq!(extract_bits(&data, 4, 8), None);
    }

    #[test]
    fn test_unpack_eight_bit_values() {
        let packed = [100u8, 200];
        let values = unpack_simple(&repr(2, 8, 0.0), &packed, None).unwrap();
        assert_eq!(values.len(), 2);
        assert!((values[0].unwrap() - 100.0).abs() < 0.1);
        assert!((values[1].unwrap() - 200.0).abs() < 0.1);
    }

    #[test]
    fn test_unpack_constant_field() {
        let values = unpack_simple(&repr(4, 0, 273.15), &[], None).unwrap();
        assert_eq!(values.len(), 4);
        assert!(values.iter().all(|v| *v == Some(273.15)));
    }

    #[test]
    fn test_bitmap_masks_points() {
        // Bitmap 0b1010_0000: points 0 and 2 present, 1 and 3 missing.
        let packed = [10u8, 20];
        let bitmap = [0b1010_0000u8];
        let values = unpack_simple(&repr(4, 8, 0.0), &packed, Some(&bitmap)).unwrap();
        assert!(values[0].is_some());
        assert!(values[1].is_none());
        assert!(values[2].is_some());
        assert!(values[3].is_none());
    }

    #[test]
    fn test_plane_marks_missing_as_nan() {
        let packed = [10u8];
        let bitmap = [0b1000_0000u8];
        let plane = unpack_to_plane(&repr(2, 8, 0.0), &packed, Some(&bitmap)).unwrap();
        assert!(!plane[0].is_nan());
        assert!(plane[1].is_nan());
    }
}
