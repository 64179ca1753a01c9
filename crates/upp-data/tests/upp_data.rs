//! End-to-end extraction against a synthetic GRIB2 file.

use std::path::PathBuf;

use bytes::Bytes;
use chrono::{TimeZone, Utc};
use grib_decoder::testdata::SyntheticGrib;
use grib_decoder::GribFile;
use upp_data::{UppData, UppError, VarSpec};

const SPECS: &str = r#"
t:
  2m:
    grib_name: TMP
    clevs: range [-35, 110, 5]
    cmap: jet
    ticks: 5
    transform: k_to_c
    unit: C
  850mb:
    grib_name: TMP
    transform: k_to_c
    unit: C
  700mb:
    grib_name: TMP
    transform: k_to_c
    unit: C
  500mb:
    grib_name: TMP
slp:
  sfc:
    grib_name: PRMSL
    transform: pa_to_hpa
    unit: hPa
u:
  10m:
    grib_name: UGRD
    unit: m/s
v:
  10m:
    grib_name: VGRD
    unit: m/s
"#;

fn sample_file() -> GribFile {
    let mut bytes = Vec::new();
    bytes.extend(
        SyntheticGrib::temperature_2m()
            .with_forecast_hour(6)
            .with_constant_value(293.15)
            .build(),
    );
    bytes.extend(
        SyntheticGrib::isobaric(0, 0, 850)
            .with_forecast_hour(6)
            .with_constant_value(263.15)
            .build(),
    );
    bytes.extend(
        SyntheticGrib::isobaric(0, 0, 500)
            .with_forecast_hour(6)
            .with_constant_value(253.15)
            .build(),
    );
    bytes.extend(
        SyntheticGrib::temperature_2m()
            .with_parameter(0, 2, 2)
            .with_level(103, 10)
            .with_forecast_hour(6)
            .with_gradient(0.0, 10.0)
            .build(),
    );
    bytes.extend(
        SyntheticGrib::temperature_2m()
            .with_parameter(0, 2, 3)
            .with_level(103, 10)
            .with_forecast_hour(6)
            .with_constant_value(5.0)
            .build(),
    );
    bytes.extend(
        SyntheticGrib::temperature_2m()
            .with_parameter(0, 3, 1)
            .with_level(101, 0)
            .with_forecast_hour(6)
            .with_constant_value(101_320.0)
            .build(),
    );
    GribFile::from_bytes(PathBuf::from("synthetic"), Bytes::from(bytes)).unwrap()
}

fn specs() -> VarSpec {
    SPECS.parse().unwrap()
}

#[test]
fn times_come_from_file_metadata() {
    let file = sample_file();
    let specs = specs();
    let data = UppData::new(&file, &specs, "t", "2m").unwrap();

    let anl = Utc.with_ymd_and_hms(2025, 12, 10, 12, 0, 0).unwrap();
    assert_eq!(data.anl_dt(), anl);
    assert_eq!(data.fhr(), 6);
    assert_eq!(
        data.valid_dt(),
        Utc.with_ymd_and_hms(2025, 12, 10, 18, 0, 0).unwrap()
    );
    assert_eq!(
        upp_common::time::title_format(data.valid_dt()),
        "20251210 18 UTC"
    );
}

#[test]
fn transform_applies_to_extracted_plane() {
    let file = sample_file();
    let specs = specs();
    let data = UppData::new(&file, &specs, "t", "2m").unwrap();

    let values = data.values().unwrap();
    assert_eq!(values.len(), 100);
    for v in values {
        assert!((v - 20.0).abs() < 0.01, "expected ~20 C, got {v}");
    }
    assert_eq!(data.units(), "C");
}

#[test]
fn stack_slices_at_matching_level() {
    let file = sample_file();
    let specs = specs();

    let t850 = UppData::new(&file, &specs, "t", "850mb").unwrap();
    assert!((t850.values().unwrap()[0] - -10.0).abs() < 0.01);

    let t500 = UppData::new(&file, &specs, "t", "500mb").unwrap();
    assert!((t500.values().unwrap()[0] - 253.15).abs() < 0.01);
}

#[test]
fn missing_level_is_level_not_found() {
    let file = sample_file();
    let specs = specs();
    let data = UppData::new(&file, &specs, "t", "700mb").unwrap();

    match data.values() {
        Err(UppError::LevelNotFound { short_name, level }) => {
            assert_eq!(short_name, "t");
            assert_eq!(level, "700mb");
        }
        other => panic!("expected LevelNotFound, got {other:?}"),
    }
}

#[test]
fn missing_definition_is_no_graphics_definition() {
    let file = sample_file();
    let specs = specs();

    match UppData::new(&file, &specs, "dewp", "2m") {
        Err(UppError::NoGraphicsDefinition { short_name, level }) => {
            assert_eq!(short_name, "dewp");
            assert_eq!(level, "2m");
        }
        other => panic!(
            "expected NoGraphicsDefinition, got {:?}",
            other.err().map(|e| e.to_string())
        ),
    }
}

#[test]
fn units_fall_back_to_parameter_table() {
    let file = sample_file();
    let specs = specs();
    // t.500mb carries no unit key, so the GRIB table's native units apply.
    let data = UppData::new(&file, &specs, "t", "500mb").unwrap();
    assert_eq!(data.units(), "K");
}

#[test]
fn plot_metadata_resolution() {
    let file = sample_file();
    let specs = specs();
    let data = UppData::new(&file, &specs, "t", "2m").unwrap();

    let clevs = data.clevs().unwrap();
    assert_eq!(clevs.len(), 29);
    assert_eq!(data.ticks(), 5);
    assert_eq!(data.cmap(), "jet");
    assert_eq!(data.colors().unwrap().len(), clevs.len());
    assert_eq!(data.numeric_level(), (Some(2.0), "m".to_string()));
}

#[test]
fn default_clevs_span_the_data() {
    let file = sample_file();
    let specs = specs();
    // No clevs configured for slp.sfc, so they derive from the plane.
    let data = UppData::new(&file, &specs, "slp", "sfc").unwrap();

    let clevs = data.clevs().unwrap();
    assert_eq!(clevs.len(), data.ticks() as usize);
    assert!((clevs[0] - 1013.2).abs() < 0.05);
    assert_eq!(data.colors().unwrap().len(), clevs.len());
}

#[test]
fn corners_order_is_extent() {
    let file = sample_file();
    let specs = specs();
    let data = UppData::new(&file, &specs, "t", "2m").unwrap();

    let [ll_lat, ur_lat, ll_lon, ur_lon] = data.corners();
    assert!((ll_lat - 45.0).abs() < 1e-6);
    assert!((ur_lat - 35.0).abs() < 1e-6);
    assert!((ll_lon - 230.0).abs() < 1e-6);
    assert!((ur_lon - 240.0).abs() < 1e-6);
}

#[test]
fn wind_pairs_u_and_v() {
    let file = sample_file();
    let specs = specs();
    let t2m = UppData::new(&file, &specs, "t", "2m").unwrap();

    let (u, v) = t2m.wind("10m").unwrap();
    assert_eq!(u.len(), v.len());
    assert!(v.iter().all(|s| (s - 5.0).abs() < 0.01));
    assert!(u[0] < u[u.len() - 1]);
}
