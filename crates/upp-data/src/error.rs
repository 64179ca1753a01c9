use thiserror::Error;
use upp_common::conversions::UnknownTransform;

#[derive(Debug, Error)]
pub enum UppError {
    #[error("no graphics definition for {short_name} at {level}")]
    NoGraphicsDefinition { short_name: String, level: String },

    #[error("level {level} not present in the {short_name} stack")]
    LevelNotFound { short_name: String, level: String },

    #[error("invalid contour level spec: {0}")]
    InvalidClevSpec(String),

    #[error("unknown color map: {0}")]
    UnknownColormap(String),

    #[error("unknown color: {0}")]
    UnknownColor(String),

    #[error(transparent)]
    Transform(#[from] UnknownTransform),

    #[error("GRIB error: {0}")]
    Grib(#[from] grib_decoder::GribError),

    #[error("specs file error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, UppError>;
