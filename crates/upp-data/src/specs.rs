//! Typed view of the graphics specs file.
//!
//! The specs file maps a variable short name to a map of level keys, each
//! holding one graphics definition. `VarSpec` is the parsed whole;
//! `FieldSpec` is one definition.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::clevs::ClevSpec;
use crate::colors::ColorSpec;
use crate::error::Result;

/// Keys a graphics definition may carry.
pub const RECOGNIZED_KEYS: &[&str] = &[
    "clevs",
    "cmap",
    "colors",
    "grib_name",
    "ticks",
    "transform",
    "unit",
];

/// One graphics definition for a (short name, level) pair.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSpec {
    /// GRIB2 parameter short name holding the data, e.g. `TMP`.
    pub grib_name: String,
    #[serde(default)]
    pub clevs: Option<ClevSpec>,
    #[serde(default)]
    pub cmap: Option<String>,
    #[serde(default)]
    pub colors: Option<ColorSpec>,
    #[serde(default)]
    pub ticks: Option<u32>,
    #[serde(default)]
    pub transform: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
}

/// The full specs file, short name -> level key -> definition.
#[derive(Debug, Clone, Deserialize)]
pub struct VarSpec(BTreeMap<String, BTreeMap<String, FieldSpec>>);

impl VarSpec {
    /// Load and parse a specs file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let spec: Self = text.parse()?;
        info!(path = %path.display(), variables = spec.0.len(), "loaded graphics specs");
        Ok(spec)
    }

    /// Look up the definition for a (short name, level) pair.
    pub fn entry(&self, short_name: &str, level: &str) -> Option<&FieldSpec> {
        self.0.get(short_name).and_then(|levels| levels.get(level))
    }

    /// Variable short names defined in the file.
    pub fn short_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Level keys defined for one variable.
    pub fn levels(&self, short_name: &str) -> Vec<&str> {
        self.0
            .get(short_name)
            .map(|levels| levels.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

impl std::str::FromStr for VarSpec {
    type Err = crate::error::UppError;

    fn from_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }
}

/// The specs file shipped with the crate.
pub fn default_specs_path() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("config/default_specs.yml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    const SAMPLE: &str = r#"
t:
  2m:
    grib_name: TMP
    clevs: range [-35, 110, 5]
    cmap: jet
    transform: k_to_c
    unit: C
  500mb:
    grib_name: TMP
    cmap: coolwarm
    transform: k_to_c
    unit: C
"#;

    #[test]
    fn test_entry_lookup() {
        let spec = VarSpec::from_str(SAMPLE).unwrap();
        let entry = spec.entry("t", "2m").unwrap();
        assert_eq!(entry.grib_name, "TMP");
        assert_eq!(entry.unit.as_deref(), Some("C"));
        assert!(spec.entry("t", "850mb").is_none());
        assert!(spec.entry("dewp", "2m").is_none());
    }

    #[test]
    fn test_levels_listing() {
        let spec = VarSpec::from_str(SAMPLE).unwrap();
        assert_eq!(spec.levels("t"), vec!["2m", "500mb"]);
    }

    #[test]
    fn test_unrecognized_key_rejected() {
        let bad = "t:\n  2m:\n    grib_name: TMP\n    linewidth: 2\n";
        assert!(VarSpec::from_str(bad).is_err());
    }

    #[test]
    fn test_default_specs_parse() {
        let spec = VarSpec::load(default_specs_path()).unwrap();
        assert!(spec.entry("t", "2m").is_some());
    }
}
