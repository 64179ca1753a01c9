//! Graphics specs and field extraction for UPP GRIB2 output.
//!
//! The specs file maps (variable, level) pairs to graphics definitions.
//! [`UppData`] joins one definition with a decoded [`GribFile`] and exposes
//! the extracted plane plus its plotting metadata.
//!
//! [`GribFile`]: grib_decoder::GribFile

pub mod clevs;
pub mod colors;
pub mod error;
pub mod specs;
pub mod upp;
pub mod validate;

pub use clevs::ClevSpec;
pub use colors::{Color, ColorSpec};
pub use error::{Result, UppError};
pub use specs::{default_specs_path, FieldSpec, VarSpec};
pub use upp::UppData;
