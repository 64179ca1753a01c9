//! Synthetic GRIB2 message builder for tests.
//!
//! Produces structurally valid single-message GRIB2 byte streams (template
//! 3.0 grids, template 4.0 products, simple packing). Multi-message files
//! are built by concatenating the output of several builders.

/// Builder for one synthetic GRIB2 message.
pub struct SyntheticGrib {
    discipline: u8,
    center: u16,
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    ni: u32,
    nj: u32,
    first_lat: i32,
    first_lon: i32,
    last_lat: i32,
    last_lon: i32,
    param_category: u8,
    param_number: u8,
    level_type: u8,
    level_value: u32,
    forecast_hour: u32,
    data: Vec<f32>,
}

impl SyntheticGrib {
    /// 2 m temperature over a 10x10 CONUS-ish domain, 15 C everywhere.
    pub fn temperature_2m() -> Self {
        let ni = 10;
        let nj = 10;
        Self {
            discipline: 0,
            center: 7, // NCEP
            year: 2025,
            month: 12,
            day: 10,
            hour: 12,
            ni,
            nj,
            first_lat: 45_000_000, // microdegrees
            first_lon: 230_000_000,
            last_lat: 35_000_000,
            last_lon: 240_000_000,
            param_category: 0,
            param_number: 0, // TMP
            level_type: 103, // m above ground
            level_value: 2,
            forecast_hour: 0,
            data: vec![288.15; (ni * nj) as usize],
        }
    }

    /// A field on an isobaric surface, level in mb.
    pub fn isobaric(category: u8, number: u8, level_mb: u32) -> Self {
        Self::temperature_2m()
            .with_parameter(0, category, number)
            .with_level(100, level_mb * 100) // stored in Pa
    }

    pub fn with_reference_time(mut self, year: u16, month: u8, day: u8, hour: u8) -> Self {
        self.year = year;
        self.month = month;
        self.day = day;
        self.hour = hour;
        self
    }

    pub fn with_grid(mut self, ni: u32, nj: u32) -> Self {
        self.ni = ni;
        self.nj = nj;
        self.data = vec![0.0; (ni * nj) as usize];
        self
    }

    pub fn with_parameter(mut self, discipline: u8, category: u8, number: u8) -> Self {
        self.discipline = discipline;
        self.param_category = category;
        self.param_number = number;
        self
    }

    pub fn with_level(mut self, level_type: u8, level_value: u32) -> Self {
        self.level_type = level_type;
        self.level_value = level_value;
        self
    }

    pub fn with_forecast_hour(mut self, hour: u32) -> Self {
        self.forecast_hour = hour;
        self
    }

    pub fn with_constant_value(mut self, value: f32) -> Self {
        self.data = vec![value; (self.ni * self.nj) as usize];
        self
    }

    pub fn with_gradient(mut self, min: f32, max: f32) -> Self {
        let n = (self.ni * self.nj) as usize;
        self.data = (0..n)
            .map(|i| min + (max - min) * (i as f32 / n as f32))
            .collect();
        self
    }

    pub fn with_data(mut self, data: Vec<f32>) -> Self {
        self.data = data;
        self
    }

    /// Build the message bytes.
    pub fn build(&self) -> Vec<u8> {
        let section1 = self.section1();
        let section3 = self.section3();
        let section4 = self.section4();
        let section5 = self.section5();
        let section6 = self.section6();
        let section7 = self.section7();

        let total = 16
            + section1.len()
            + section3.len()
            + section4.len()
            + section5.len()
            + section6.len()
            + section7.len()
            + 4;

        let mut msg = Vec::with_capacity(total);
        msg.extend_from_slice(b"GRIB");
        msg.extend_from_slice(&[0, 0]);
        msg.push(self.discipline);
        msg.push(2); // edition
        msg.extend_from_slice(&(total as u64).to_be_bytes());

        msg.extend_from_slice(&section1);
        msg.extend_from_slice(&section3);
        msg.extend_from_slice(&section4);
        msg.extend_from_slice(&section5);
        msg.extend_from_slice(&section6);
        msg.extend_from_slice(&section7);
        msg.extend_from_slice(b"7777");

        msg
    }

    fn section1(&self) -> Vec<u8> {
        let mut s = Vec::new();
        s.extend_from_slice(&21u32.to_be_bytes());
        s.push(1);
        s.extend_from_slice(&self.center.to_be_bytes());
        s.extend_from_slice(&0u16.to_be_bytes()); // sub-center
        s.push(2); // master table version
        s.push(1); // local table version
        s.push(1); // significance of reference time
        s.extend_from_slice(&self.year.to_be_bytes());
        s.push(self.month);
        s.push(self.day);
        s.push(self.hour);
        s.push(0);
        s.push(0);
        s.push(0); // production status
        s.push(1); // data type: forecast
        s
    }

    fn section3(&self) -> Vec<u8> {
        let mut s = Vec::new();
        s.extend_from_slice(&(14u32 + 58).to_be_bytes());
        s.push(3);
        s.push(0); // source of grid definition
        s.extend_from_slice(&(self.ni * self.nj).to_be_bytes());
        s.push(0); // octets for optional list
        s.push(0); // interpretation
        s.extend_from_slice(&0u16.to_be_bytes()); // template 3.0

        s.push(6); // shape of earth
        s.push(0);
        s.extend_from_slice(&0u32.to_be_bytes());
        s.push(0);
        s.extend_from_slice(&0u32.to_be_bytes());
        s.push(0);
        s.extend_from_slice(&0u32.to_be_bytes());
        s.extend_from_slice(&self.ni.to_be_bytes());
        s.extend_from_slice(&self.nj.to_be_bytes());
        s.extend_from_slice(&0u32.to_be_bytes()); // basic angle
        s.extend_from_slice(&0xFFFF_FFFFu32.to_be_bytes()); // subdivisions
        s.extend_from_slice(&self.first_lat.to_be_bytes());
        s.extend_from_slice(&self.first_lon.to_be_bytes());
        s.push(48); // resolution and component flags
        s.extend_from_slice(&self.last_lat.to_be_bytes());
        s.extend_from_slice(&self.last_lon.to_be_bytes());
        let di = if self.ni > 1 {
            (self.last_lon - self.first_lon).unsigned_abs() / (self.ni - 1)
        } else {
            0
        };
        let dj = if self.nj > 1 {
            (self.last_lat - self.first_lat).unsigned_abs() / (self.nj - 1)
        } else {
            0
        };
        s.extend_from_slice(&di.to_be_bytes());
        s.extend_from_slice(&dj.to_be_bytes());
        s.push(0); // scanning mode: +i, -j
        s
    }

    fn section4(&self) -> Vec<u8> {
        let mut s = Vec::new();
        s.extend_from_slice(&34u32.to_be_bytes());
        s.push(4);
        s.extend_from_slice(&0u16.to_be_bytes()); // coordinate values
        s.extend_from_slice(&0u16.to_be_bytes()); // template 4.0
        s.push(self.param_category);
        s.push(self.param_number);
        s.push(2); // generating process: forecast
        s.push(0);
        s.push(0);
        s.extend_from_slice(&0u16.to_be_bytes()); // cutoff hours
        s.push(0); // cutoff minutes
        s.push(1); // time range unit: hours
        s.extend_from_slice(&self.forecast_hour.to_be_bytes());
        s.push(self.level_type);
        s.push(0); // scale factor
        s.extend_from_slice(&self.level_value.to_be_bytes());
        s.push(255); // second fixed surface: none
        s.push(0);
        s.extend_from_slice(&0u32.to_be_bytes());
        s
    }

    fn packing(&self) -> (f32, i16) {
        let (min, max) = self
            .data
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        let range = max - min;
        if range == 0.0 {
            (min, 0)
        } else {
            // 16-bit packing: pick E so the range fits in 65535 steps.
            ((min), (range / 65535.0).log2().ceil() as i16)
        }
    }

    fn section5(&self) -> Vec<u8> {
        let (reference, binary_scale) = self.packing();
        let range_is_zero = self
            .data
            .iter()
            .all(|v| *v == self.data.first().copied().unwrap_or(0.0));
        let bits: u8 = if range_is_zero { 0 } else { 16 };

        let mut s = Vec::new();
        s.extend_from_slice(&21u32.to_be_bytes());
        s.push(5);
        s.extend_from_slice(&(self.ni * self.nj).to_be_bytes());
        s.extend_from_slice(&0u16.to_be_bytes()); // template 5.0
        s.extend_from_slice(&reference.to_be_bytes());
        s.extend_from_slice(&binary_scale.to_be_bytes());
        s.extend_from_slice(&0i16.to_be_bytes()); // decimal scale
        s.push(bits);
        s.push(0); // original field type: float
        s
    }

    fn section6(&self) -> Vec<u8> {
        let mut s = Vec::new();
        s.extend_from_slice(&6u32.to_be_bytes());
        s.push(6);
        s.push(255); // no bitmap
        s
    }

    fn section7(&self) -> Vec<u8> {
        let (reference, binary_scale) = self.packing();
        let scale = 2.0_f32.powi(binary_scale as i32);

        let mut packed = Vec::new();
        let constant = self
            .data
            .iter()
            .all(|v| *v == self.data.first().copied().unwrap_or(0.0));
        if !constant {
            for &v in &self.data {
                let q = ((v - reference) / scale).round() as u16;
                packed.extend_from_slice(&q.to_be_bytes());
            }
        }

        let mut s = Vec::new();
        s.extend_from_slice(&(5 + packed.len() as u32).to_be_bytes());
        s.push(7);
        s.extend_from_slice(&packed);
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_framing() {
        let bytes = SyntheticGrib::temperature_2m().build();
        assert_eq!(&bytes[0..4], b"GRIB");
        assert_eq!(bytes[7], 2);
        assert_eq!(&bytes[bytes.len() - 4..], b"7777");

        let declared = u64::from_be_bytes(bytes[8..16].try_into().unwrap());
        assert_eq!(declared as usize, bytes.len());
    }

    #[test]
    fn test_isobaric_level_in_pa() {
        let bytes = SyntheticGrib::isobaric(0, 0, 500).build();
        // Section 0 discipline is meteorological.
        assert_eq!(bytes[6], 0);
        // Level value survives the whole parse path; checked end to end in
        // the reader tests.
        assert_eq!(&bytes[0..4], b"GRIB");
    }
}
