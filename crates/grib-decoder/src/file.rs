//! File-level access to decoded GRIB2 fields.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use upp_common::GridCorners;

use crate::error::{GribError, Result};
use crate::reader::{GribMessage, MessageScanner};
use crate::sections::GridDefinition;
use crate::tables;

/// Decoded data for one parameter.
///
/// A parameter present at a single level is a plane; one present at several
/// levels of the same vertical coordinate is a stack with the coordinate
/// values alongside.
#[derive(Debug, Clone)]
pub enum FieldData {
    Plane(Vec<f32>),
    Stack {
        /// Vertical coordinate of each plane, in file order (Pa for
        /// isobaric surfaces).
        levels: Vec<f64>,
        planes: Vec<Vec<f32>>,
    },
}

impl FieldData {
    pub fn num_levels(&self) -> usize {
        match self {
            FieldData::Plane(_) => 1,
            FieldData::Stack { planes, .. } => planes.len(),
        }
    }

    /// The level coordinate array for a stack, empty for a plane.
    pub fn levels(&self) -> &[f64] {
        match self {
            FieldData::Plane(_) => &[],
            FieldData::Stack { levels, .. } => levels,
        }
    }
}

/// One named field from a GRIB file.
#[derive(Debug, Clone)]
pub struct GribField {
    pub short_name: String,
    /// Code table 4.5 level type shared by all planes of the field.
    pub level_type: u8,
    /// Descriptor text for the field's first plane, e.g. `surface`.
    pub descriptor: String,
    /// Native units from the parameter table, when known.
    pub units: Option<&'static str>,
    pub data: FieldData,
}

/// A GRIB2 file decoded into named fields.
///
/// All messages are decoded up front at open time; lookups afterwards are
/// map reads. Fields are keyed by parameter short name; the same parameter
/// can appear once per level type (2 m temperature and isobaric temperature
/// are separate fields).
pub struct GribFile {
    path: PathBuf,
    reference_time: DateTime<Utc>,
    forecast_hour: u32,
    grid: GridDefinition,
    fields: HashMap<String, Vec<GribField>>,
}

impl GribFile {
    /// Open and fully decode a GRIB2 file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let bytes = Bytes::from(std::fs::read(&path)?);
        let file = Self::from_bytes(path.clone(), bytes)?;
        info!(
            path = %path.display(),
            fields = file.fields.len(),
            forecast_hour = file.forecast_hour,
            "opened GRIB file"
        );
        Ok(file)
    }

    /// Decode from an in-memory buffer.
    pub fn from_bytes(path: PathBuf, bytes: Bytes) -> Result<Self> {
        let mut scanner = MessageScanner::new(bytes);

        let mut reference_time = None;
        let mut forecast_hour = None;
        let mut grid = None;
        let mut fields: HashMap<String, Vec<GribField>> = HashMap::new();

        while let Some(message) = scanner.next_message()? {
            if reference_time.is_none() {
                reference_time = Some(message.identification.reference_time);
            }
            if forecast_hour.is_none() {
                forecast_hour = Some(message.product_definition.forecast_hour);
            }
            if grid.is_none() {
                grid = Some(message.grid_definition.clone());
            }

            Self::index_message(&mut fields, &message)?;
        }

        Ok(Self {
            path,
            reference_time: reference_time
                .ok_or_else(|| GribError::InvalidFormat("file holds no messages".to_string()))?,
            forecast_hour: forecast_hour.unwrap_or(0),
            grid: grid
                .ok_or_else(|| GribError::InvalidFormat("file holds no grid".to_string()))?,
            fields,
        })
    }

    fn index_message(
        fields: &mut HashMap<String, Vec<GribField>>,
        message: &GribMessage,
    ) -> Result<()> {
        let name = message.parameter();
        let level_type = message.product_definition.level_type;
        let level_value = message.product_definition.level_value;
        let plane = message.decode_values()?;

        let entries = fields.entry(name.clone()).or_default();
        match entries.iter_mut().find(|f| f.level_type == level_type) {
            None => entries.push(GribField {
                short_name: name,
                level_type,
                descriptor: tables::level_descriptor(level_type, level_value),
                units: message.units(),
                data: if tables::level_has_coordinate(level_type) {
                    FieldData::Stack {
                        levels: vec![level_value],
                        planes: vec![plane],
                    }
                } else {
                    FieldData::Plane(plane)
                },
            }),
            Some(field) => match &mut field.data {
                FieldData::Stack { levels, planes } => {
                    levels.push(level_value);
                    planes.push(plane);
                }
                FieldData::Plane(_) => {
                    warn!(
                        field = %field.short_name,
                        level_type,
                        "duplicate plane for level-less field, keeping the first"
                    );
                }
            },
        }

        Ok(())
    }

    /// Look up a decoded field by parameter short name. When the parameter
    /// exists under several level types, the first one in file order wins;
    /// use [`field_at`](Self::field_at) to pick a level type.
    pub fn field(&self, short_name: &str) -> Result<&GribField> {
        self.fields
            .get(short_name)
            .and_then(|entries| entries.first())
            .ok_or_else(|| {
                debug!(field = short_name, path = %self.path.display(), "field lookup miss");
                GribError::FieldNotFound(short_name.to_string())
            })
    }

    /// Look up a decoded field by parameter short name and level type.
    pub fn field_at(&self, short_name: &str, level_type: u8) -> Result<&GribField> {
        self.fields
            .get(short_name)
            .and_then(|entries| entries.iter().find(|f| f.level_type == level_type))
            .ok_or_else(|| {
                debug!(
                    field = short_name,
                    level_type,
                    path = %self.path.display(),
                    "field lookup miss"
                );
                GribError::FieldNotFound(format!(
                    "{short_name} at {}",
                    tables::level_type_name(level_type)
                ))
            })
    }

    /// Short names of every decoded field.
    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Analysis time of the model run.
    pub fn reference_time(&self) -> DateTime<Utc> {
        self.reference_time
    }

    pub fn forecast_hour(&self) -> u32 {
        self.forecast_hour
    }

    pub fn grid(&self) -> &GridDefinition {
        &self.grid
    }

    /// First and last grid point coordinates, in grid scan order.
    pub fn corners(&self) -> GridCorners {
        GridCorners::new(
            self.grid.first_lat,
            self.grid.first_lon,
            self.grid.last_lat,
            self.grid.last_lon,
        )
    }

    /// Latitude and longitude of every grid row/column.
    pub fn latlons(&self) -> (Vec<f64>, Vec<f64>) {
        (self.grid.latitudes(), self.grid.longitudes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdata::SyntheticGrib;

    fn stacked_height_file() -> GribFile {
        let mut bytes = Vec::new();
        for mb in [700u32, 500, 250] {
            bytes.extend(
                SyntheticGrib::isobaric(3, 5, mb)
                    .with_constant_value(mb as f32 * 10.0)
                    .build(),
            );
        }
        GribFile::from_bytes(PathBuf::from("synthetic"), Bytes::from(bytes)).unwrap()
    }

    #[test]
    fn test_field_lookup_by_name() {
        let bytes = SyntheticGrib::temperature_2m().build();
        let file = GribFile::from_bytes(PathBuf::from("synthetic"), Bytes::from(bytes)).unwrap();

        let field = file.field("TMP").unwrap();
        assert_eq!(field.short_name, "TMP");
        assert_eq!(field.units, Some("K"));
        assert_eq!(field.data.num_levels(), 1);
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let bytes = SyntheticGrib::temperature_2m().build();
        let file = GribFile::from_bytes(PathBuf::from("synthetic"), Bytes::from(bytes)).unwrap();

        match file.field("NOPE") {
            Err(GribError::FieldNotFound(name)) => assert_eq!(name, "NOPE"),
            other => panic!("expected FieldNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_isobaric_messages_stack() {
        let file = stacked_height_file();
        let field = file.field("HGT").unwrap();

        assert_eq!(field.data.num_levels(), 3);
        assert_eq!(field.data.levels(), &[70_000.0, 50_000.0, 25_000.0]);
    }

    #[test]
    fn test_same_parameter_under_two_level_types() {
        let mut bytes = SyntheticGrib::temperature_2m().build();
        bytes.extend(
            SyntheticGrib::isobaric(0, 0, 850)
                .with_constant_value(280.0)
                .build(),
        );
        let file = GribFile::from_bytes(PathBuf::from("synthetic"), Bytes::from(bytes)).unwrap();

        let near_surface = file.field_at("TMP", 103).unwrap();
        assert_eq!(near_surface.data.levels(), &[2.0]);

        let isobaric = file.field_at("TMP", 100).unwrap();
        assert_eq!(isobaric.data.levels(), &[85_000.0]);

        // Unqualified lookup resolves to the first level type in the file.
        assert_eq!(file.field("TMP").unwrap().level_type, 103);

        match file.field_at("HGT", 100) {
            Err(GribError::FieldNotFound(what)) => {
                assert_eq!(what, "HGT at isobaric surface");
            }
            other => panic!("expected FieldNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_corners_come_from_grid_extremes() {
        let bytes = SyntheticGrib::temperature_2m().build();
        let file = GribFile::from_bytes(PathBuf::from("synthetic"), Bytes::from(bytes)).unwrap();

        let corners = file.corners();
        assert!((corners.ll_lat - 45.0).abs() < 1e-6);
        assert!((corners.ll_lon - 230.0).abs() < 1e-6);
        assert!((corners.ur_lat - 35.0).abs() < 1e-6);
        assert!((corners.ur_lon - 240.0).abs() < 1e-6);
    }

    #[test]
    fn test_latlons_match_grid_dims() {
        let bytes = SyntheticGrib::temperature_2m().with_grid(8, 6).build();
        let file = GribFile::from_bytes(PathBuf::from("synthetic"), Bytes::from(bytes)).unwrap();

        let (lats, lons) = file.latlons();
        assert_eq!(lats.len(), 6);
        assert_eq!(lons.len(), 8);
    }

    #[test]
    fn test_open_from_disk() {
        let bytes = SyntheticGrib::temperature_2m().build();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.grib2");
        std::fs::write(&path, &bytes).unwrap();

        let file = GribFile::open(&path).unwrap();
        assert!(file.field("TMP").is_ok());
        assert_eq!(file.forecast_hour(), 0);
    }
}
