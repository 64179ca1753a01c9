//! Error types for GRIB2 decoding.

use thiserror::Error;

/// Errors that can occur while decoding GRIB2 data.
#[derive(Debug, Error)]
pub enum GribError {
    /// The data is not a GRIB2 message.
    #[error("invalid GRIB2 data: {0}")]
    InvalidFormat(String),

    /// A section within a message could not be parsed.
    #[error("invalid section {section}: {reason}")]
    InvalidSection { section: u8, reason: String },

    /// Packed data could not be unpacked.
    #[error("unpacking failed: {0}")]
    Unpacking(String),

    /// The requested variable is not present in the file.
    #[error("GRIB variable not found: {0}")]
    FieldNotFound(String),

    /// IO error reading the file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl GribError {
    pub fn invalid_section(section: u8, reason: impl Into<String>) -> Self {
        Self::InvalidSection {
            section,
            reason: reason.into(),
        }
    }
}

/// Result type for GRIB2 decoding operations.
pub type Result<T> = std::result::Result<T, GribError>;
