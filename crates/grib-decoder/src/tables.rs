//! GRIB2 code tables for UPP output.
//!
//! Maps (discipline, category, number) triples from code table 4.2 to the
//! short names and native units used by NCEP products, and level type codes
//! from code table 4.5 to descriptor text.

/// Parameter short name for a code table 4.2 triple, when known.
pub fn short_name(discipline: u8, category: u8, number: u8) -> Option<&'static str> {
    let name = match (discipline, category, number) {
        // Temperature
        (0, 0, 0) => "TMP",
        (0, 0, 2) => "POT",
        (0, 0, 6) => "DPT",

        // Moisture
        (0, 1, 0) => "SPFH",
        (0, 1, 1) => "RH",
        (0, 1, 3) => "PWAT",
        (0, 1, 7) => "PRATE",
        (0, 1, 8) => "APCP",
        (0, 1, 13) => "WEASD",

        // Momentum
        (0, 2, 1) => "WIND",
        (0, 2, 2) => "UGRD",
        (0, 2, 3) => "VGRD",
        (0, 2, 8) => "VVEL",
        (0, 2, 10) => "ABSV",
        (0, 2, 22) => "GUST",

        // Mass
        (0, 3, 0) => "PRES",
        (0, 3, 1) => "PRMSL",
        (0, 3, 5) => "HGT",

        // Cloud
        (0, 6, 1) => "TCDC",
        (0, 6, 6) => "CWAT",

        // Stability
        (0, 7, 6) => "CAPE",
        (0, 7, 7) => "CIN",
        (0, 7, 8) => "HLCY",
        (0, 7, 192) => "LFTX",

        // Radar
        (0, 16, 196) => "REFC",
        (0, 16, 197) => "RETOP",

        // Physical atmospheric properties
        (0, 19, 0) => "VIS",

        _ => return None,
    };
    Some(name)
}

/// Native units for a code table 4.2 triple, when known.
pub fn native_units(discipline: u8, category: u8, number: u8) -> Option<&'static str> {
    let units = match (discipline, category, number) {
        (0, 0, 0) | (0, 0, 2) | (0, 0, 6) => "K",
        (0, 1, 0) => "kg/kg",
        (0, 1, 1) => "%",
        (0, 1, 3) | (0, 1, 8) | (0, 1, 13) => "kg/m^2",
        (0, 1, 7) => "kg/m^2/s",
        (0, 2, 1) | (0, 2, 2) | (0, 2, 3) | (0, 2, 22) => "m/s",
        (0, 2, 8) => "Pa/s",
        (0, 2, 10) => "1/s",
        (0, 3, 0) | (0, 3, 1) => "Pa",
        (0, 3, 5) => "gpm",
        (0, 6, 1) => "%",
        (0, 6, 6) => "kg/m^2",
        (0, 7, 6) | (0, 7, 7) => "J/kg",
        (0, 7, 8) => "m^2/s^2",
        (0, 7, 192) => "K",
        (0, 16, 196) => "dBZ",
        (0, 16, 197) => "m",
        (0, 19, 0) => "m",
        _ => return None,
    };
    Some(units)
}

/// Fallback short name for parameters outside the table.
pub fn coded_name(discipline: u8, category: u8, number: u8) -> String {
    format!("P{discipline}_{category}_{number}")
}

/// Descriptor text for a code table 4.5 level type and coordinate value.
pub fn level_descriptor(level_type: u8, level_value: f64) -> String {
    match level_type {
        100 => format!("{} mb", level_value / 100.0),
        102 => format!("{level_value} m above MSL"),
        103 => format!("{level_value} m above ground"),
        106 => format!("{level_value} m below surface"),
        1 | 2 | 3 | 4 | 6 | 7 | 8 | 101 | 200 | 220 => level_type_name(level_type),
        other => format!("{} value {level_value}", level_type_name(other)),
    }
}

/// Name of a code table 4.5 level type, without any coordinate value.
pub fn level_type_name(level_type: u8) -> String {
    match level_type {
        1 => "surface".to_string(),
        2 => "cloud base".to_string(),
        3 => "cloud top".to_string(),
        4 => "0C isotherm".to_string(),
        6 => "max wind".to_string(),
        7 => "tropopause".to_string(),
        8 => "top of atmosphere".to_string(),
        100 => "isobaric surface".to_string(),
        101 => "mean sea level".to_string(),
        102 => "height above MSL".to_string(),
        103 => "height above ground".to_string(),
        106 => "depth below surface".to_string(),
        200 => "entire atmosphere".to_string(),
        220 => "planetary boundary layer".to_string(),
        other => format!("level type {other}"),
    }
}

/// Whether a level type carries a meaningful vertical coordinate value.
pub fn level_has_coordinate(level_type: u8) -> bool {
    matches!(level_type, 100 | 102 | 103 | 104 | 106 | 108)
}
