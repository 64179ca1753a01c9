//! The extraction facade tying a GRIB file to a graphics definition.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use grib_decoder::{FieldData, GribFile};
use tracing::debug;
use upp_common::{conversions::Transform, level, GridCorners, Level, LevelUnit, ValidTime};

use crate::colors::{self, Color};
use crate::error::{Result, UppError};
use crate::specs::{FieldSpec, VarSpec};

/// Tolerance when matching a level against a stack's coordinate array.
const LEVEL_EPSILON: f64 = 1e-3;

const DEFAULT_TICKS: u32 = 10;
const DEFAULT_CMAP: &str = "jet";

/// Read-only view of one (variable, level) pair in a GRIB file, carrying
/// the graphics definition that tells it what to extract and how to label
/// it. The extracted plane is computed on first use and memoized.
pub struct UppData<'a> {
    file: &'a GribFile,
    specs: &'a VarSpec,
    short_name: String,
    level: String,
    parsed_level: Option<Level>,
    spec: &'a FieldSpec,
    values: OnceLock<Vec<f32>>,
}

impl<'a> UppData<'a> {
    /// Build the view, failing when the specs file has no definition for
    /// the pair.
    pub fn new(
        file: &'a GribFile,
        specs: &'a VarSpec,
        short_name: &str,
        level: &str,
    ) -> Result<Self> {
        let spec = specs
            .entry(short_name, level)
            .ok_or_else(|| UppError::NoGraphicsDefinition {
                short_name: short_name.to_string(),
                level: level.to_string(),
            })?;

        Ok(Self {
            file,
            specs,
            short_name: short_name.to_string(),
            level: level.to_string(),
            parsed_level: Level::parse(level),
            spec,
            values: OnceLock::new(),
        })
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn level(&self) -> &str {
        &self.level
    }

    pub fn spec(&self) -> &FieldSpec {
        self.spec
    }

    /// Analysis time of the model run.
    pub fn anl_dt(&self) -> DateTime<Utc> {
        self.file.reference_time()
    }

    /// Time the forecast is valid for.
    pub fn valid_dt(&self) -> DateTime<Utc> {
        ValidTime::new(self.file.reference_time(), self.file.forecast_hour()).valid_datetime()
    }

    /// Forecast hour.
    pub fn fhr(&self) -> u32 {
        self.file.forecast_hour()
    }

    /// Contour levels. Configured spec when present, otherwise evenly
    /// spaced ticks over the extracted plane's finite range.
    pub fn clevs(&self) -> Result<Vec<f64>> {
        if let Some(spec) = &self.spec.clevs {
            return spec.resolve();
        }

        let values = self.values()?;
        let (min, max) = finite_range(values);
        let n = self.ticks().max(2) as usize;
        let step = (max - min) / (n - 1) as f64;
        Ok((0..n).map(|i| min + step * i as f64).collect())
    }

    /// Name of the configured color map.
    pub fn cmap(&self) -> &str {
        self.spec.cmap.as_deref().unwrap_or(DEFAULT_CMAP)
    }

    /// Colors for the contour bands: the configured list or function, or
    /// the color map sampled once per contour level.
    pub fn colors(&self) -> Result<Vec<Color>> {
        let clevs = self.clevs()?;
        match &self.spec.colors {
            Some(spec) => spec.resolve(&clevs, self.cmap()),
            None => colors::sample_colormap(self.cmap(), clevs.len()),
        }
    }

    /// Corner coordinates as `[ll_lat, ur_lat, ll_lon, ur_lon]`.
    pub fn corners(&self) -> [f64; 4] {
        self.file.corners().as_extent()
    }

    pub fn grid_corners(&self) -> GridCorners {
        self.file.corners()
    }

    /// The level key split into numeric magnitude and letter run.
    pub fn numeric_level(&self) -> (Option<f64>, String) {
        level::split_numeric(&self.level)
    }

    /// Number of colorbar ticks, default 10.
    pub fn ticks(&self) -> u32 {
        self.spec.ticks.unwrap_or(DEFAULT_TICKS)
    }

    /// Display units: the configured label, else the parameter table's
    /// native units.
    pub fn units(&self) -> String {
        if let Some(unit) = &self.spec.unit {
            return unit.clone();
        }
        self.file
            .field(&self.spec.grib_name)
            .ok()
            .and_then(|f| f.units)
            .unwrap_or("")
            .to_string()
    }

    /// Grid shape as (nj, ni).
    pub fn grid_dims(&self) -> (usize, usize) {
        let grid = self.file.grid();
        (grid.nj, grid.ni)
    }

    /// The extracted plane with the configured transform applied.
    /// Computed on first call, memoized afterwards.
    pub fn values(&self) -> Result<&[f32]> {
        if let Some(values) = self.values.get() {
            return Ok(values);
        }
        let computed = self.extract()?;
        Ok(self.values.get_or_init(|| computed))
    }

    fn extract(&self) -> Result<Vec<f32>> {
        // A parameter can exist under several level types in one file (2 m
        // temperature next to isobaric temperature), so a numeric level
        // narrows the lookup to its level type.
        let field = match self.parsed_level.as_ref().and_then(level_type_hint) {
            Some(level_type) => self.file.field_at(&self.spec.grib_name, level_type)?,
            None => self.file.field(&self.spec.grib_name)?,
        };

        let mut plane = match &field.data {
            FieldData::Plane(plane) => plane.clone(),
            FieldData::Stack { levels, planes } => {
                let index = self.level_index(levels)?;
                planes[index].clone()
            }
        };

        if let Some(name) = &self.spec.transform {
            let transform = Transform::from_name(name)?;
            transform.apply_field(&mut plane);
        }

        debug!(
            short_name = %self.short_name,
            level = %self.level,
            grib_name = %self.spec.grib_name,
            points = plane.len(),
            "extracted field"
        );
        Ok(plane)
    }

    /// Index into a stack whose level coordinate matches this view's level.
    fn level_index(&self, levels: &[f64]) -> Result<usize> {
        let target = self
            .parsed_level
            .as_ref()
            .and_then(Level::coordinate_value)
            .ok_or_else(|| self.level_not_found())?;

        levels
            .iter()
            .position(|lvl| (lvl - target).abs() < LEVEL_EPSILON)
            .ok_or_else(|| self.level_not_found())
    }

    fn level_not_found(&self) -> UppError {
        UppError::LevelNotFound {
            short_name: self.short_name.clone(),
            level: self.level.clone(),
        }
    }

    /// Wind components at a level: the value planes of the `u` and `v`
    /// definitions, as a pair.
    pub fn wind(&self, level: &str) -> Result<(Vec<f32>, Vec<f32>)> {
        let u = UppData::new(self.file, self.specs, "u", level)?;
        let v = UppData::new(self.file, self.specs, "v", level)?;
        Ok((u.values()?.to_vec(), v.values()?.to_vec()))
    }
}

/// GRIB2 level type (code table 4.5) implied by a level key's unit.
fn level_type_hint(level: &Level) -> Option<u8> {
    match level {
        Level::NumericUnit { unit, .. } => match unit {
            LevelUnit::Mb => Some(100),
            LevelUnit::M => Some(103),
            LevelUnit::Cm => Some(106),
            LevelUnit::Ds => None,
        },
        Level::Descriptor(_) | Level::StatNumeric { .. } => None,
    }
}

fn finite_range(values: &[f32]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        if v.is_finite() {
            min = min.min(*v as f64);
            max = max.max(*v as f64);
        }
    }
    if min > max {
        (0.0, 1.0)
    } else if min == max {
        (min, min + 1.0)
    } else {
        (min, max)
    }
}
