//! GRIB2 decoding for UPP model output.
//!
//! Parses GRIB2 messages (WMO FM 92 Edition 2) section by section, unpacks
//! simple-packed data, and exposes decoded fields indexed by parameter short
//! name through [`GribFile`].

pub mod error;
pub mod file;
pub mod reader;
pub mod sections;
pub mod tables;
pub mod testdata;
pub mod unpacking;

pub use error::GribError;
pub use file::{FieldData, GribField, GribFile};
pub use reader::{GribMessage, MessageScanner};
pub use sections::{
    DataRepresentation, GridDefinition, Identification, Indicator, ProductDefinition,
};
pub use unpacking::unpack_simple;
