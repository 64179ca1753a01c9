//! Contour level resolution.
//!
//! A `clevs` entry in the specs file is either a literal list of values, a
//! `range [start, stop, step]` expression, or the name of a predefined
//! level set.

use serde::Deserialize;

use crate::error::{Result, UppError};

/// Accumulated precipitation levels, in millimeters. Irregular on purpose:
/// light amounts need finer contours than heavy ones.
const PRECIP_LEVELS: &[f64] = &[
    0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 15.0, 20.0, 25.0, 35.0, 50.0, 75.0, 100.0,
];

/// Snowfall levels, in millimeters of liquid equivalent.
const SNOW_LEVELS: &[f64] = &[0.1, 0.5, 1.0, 2.5, 5.0, 7.5, 10.0, 15.0, 20.0, 30.0];

/// A `clevs` entry as written in the specs file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ClevSpec {
    /// Literal list of contour values.
    List(Vec<f64>),
    /// `range [start, stop, step]` or a named level set.
    Expr(String),
}

impl ClevSpec {
    /// Resolve the spec into concrete contour values.
    pub fn resolve(&self) -> Result<Vec<f64>> {
        match self {
            ClevSpec::List(values) => Ok(values.clone()),
            ClevSpec::Expr(expr) => {
                let expr = expr.trim();
                if let Some(args) = expr.strip_prefix("range") {
                    parse_range(args.trim())
                } else {
                    named_levels(expr)
                        .map(|v| v.to_vec())
                        .ok_or_else(|| UppError::InvalidClevSpec(expr.to_string()))
                }
            }
        }
    }
}

/// Predefined level sets addressable by name from the specs file.
pub fn named_levels(name: &str) -> Option<&'static [f64]> {
    match name {
        "precip" => Some(PRECIP_LEVELS),
        "snow" => Some(SNOW_LEVELS),
        _ => None,
    }
}

/// Parse `[start, stop, step]` into a half-open range of values, stop
/// excluded. Step defaults to 1 when omitted.
fn parse_range(args: &str) -> Result<Vec<f64>> {
    let inner = args
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| UppError::InvalidClevSpec(format!("range {args}")))?;

    let parts: Vec<f64> = inner
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| UppError::InvalidClevSpec(format!("range {args}")))?;

    let (start, stop, step) = match parts.as_slice() {
        [start, stop] => (*start, *stop, 1.0),
        [start, stop, step] => (*start, *stop, *step),
        _ => return Err(UppError::InvalidClevSpec(format!("range {args}"))),
    };
    if step == 0.0 || (stop - start).signum() != step.signum() && start != stop {
        return Err(UppError::InvalidClevSpec(format!("range {args}")));
    }

    let n = ((stop - start) / step).ceil().max(0.0) as usize;
    Ok((0..n).map(|i| start + step * i as f64).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_list_passes_through() {
        let spec = ClevSpec::List(vec![1.0, 2.0, 5.0]);
        assert_eq!(spec.resolve().unwrap(), vec![1.0, 2.0, 5.0]);
    }

    #[test]
    fn test_range_excludes_stop() {
        let spec = ClevSpec::Expr("range [0, 100, 10]".to_string());
        let levels = spec.resolve().unwrap();
        assert_eq!(levels.len(), 10);
        assert_eq!(levels[0], 0.0);
        assert_eq!(levels[9], 90.0);
    }

    #[test]
    fn test_range_negative_start() {
        let spec = ClevSpec::Expr("range [-35, 110, 5]".to_string());
        let levels = spec.resolve().unwrap();
        assert_eq!(levels[0], -35.0);
        assert_eq!(*levels.last().unwrap(), 105.0);
    }

    #[test]
    fn test_range_default_step() {
        let spec = ClevSpec::Expr("range [0, 5]".to_string());
        assert_eq!(spec.resolve().unwrap(), vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_descending_range() {
        let spec = ClevSpec::Expr("range [1000, 850, -50]".to_string());
        assert_eq!(spec.resolve().unwrap(), vec![1000.0, 950.0, 900.0]);
    }

    #[test]
    fn test_named_set() {
        let spec = ClevSpec::Expr("precip".to_string());
        assert_eq!(spec.resolve().unwrap(), PRECIP_LEVELS.to_vec());
    }

    #[test]
    fn test_bad_specs_rejected() {
        for bad in ["range [0, 10, 0]", "range 0 10", "range [a, b]", "nope"] {
            assert!(ClevSpec::Expr(bad.to_string()).resolve().is_err(), "{bad}");
        }
    }

    #[test]
    fn test_yaml_forms_deserialize() {
        let list: ClevSpec = serde_yaml::from_str("[1, 2, 3]").unwrap();
        assert_eq!(list, ClevSpec::List(vec![1.0, 2.0, 3.0]));

        let expr: ClevSpec = serde_yaml::from_str("range [0, 10, 2]").unwrap();
        assert_eq!(expr, ClevSpec::Expr("range [0, 10, 2]".to_string()));
    }
}
