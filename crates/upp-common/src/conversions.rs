//! Linear unit conversions applied to extracted fields.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kelvin to Celsius.
pub fn k_to_c(value: f32) -> f32 {
    value - 273.15
}

/// Meters to decameters.
pub fn m_to_dm(value: f32) -> f32 {
    value / 10.0
}

/// Pascals to hectopascals.
pub fn pa_to_hpa(value: f32) -> f32 {
    value / 100.0
}

/// A named post-extraction conversion, looked up from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transform {
    KToC,
    MToDm,
    PaToHpa,
    None,
}

#[derive(Debug, Error)]
#[error("unknown transform: {0}")]
pub struct UnknownTransform(pub String);

impl Transform {
    /// Resolve a configured transform name.
    pub fn from_name(name: &str) -> Result<Self, UnknownTransform> {
        match name {
            "k_to_c" | "conversions.k_to_c" => Ok(Transform::KToC),
            "m_to_dm" | "conversions.m_to_dm" => Ok(Transform::MToDm),
            "pa_to_hpa" | "conversions.pa_to_hpa" => Ok(Transform::PaToHpa),
            "None" | "none" => Ok(Transform::None),
            other => Err(UnknownTransform(other.to_string())),
        }
    }

    /// Apply the conversion to a single value.
    pub fn apply(&self, value: f32) -> f32 {
        match self {
            Transform::KToC => k_to_c(value),
            Transform::MToDm => m_to_dm(value),
            Transform::PaToHpa => pa_to_hpa(value),
            Transform::None => value,
        }
    }

    /// Apply the conversion elementwise to a field.
    pub fn apply_field(&self, field: &mut [f32]) {
        if matches!(self, Transform::None) {
            return;
        }
        for v in field.iter_mut() {
            *v = self.apply(*v);
        }
    }
}
