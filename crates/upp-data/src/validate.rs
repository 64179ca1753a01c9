//! Structural validation of a specs file.
//!
//! Walks the raw YAML tree and reports every entry that does not fit the
//! expected shape: unknown leaf keys, level keys matching none of the
//! permitted patterns, and leaf values their checkers reject.

use serde_yaml::Value;
use upp_common::{conversions::Transform, Level};

use crate::clevs::ClevSpec;
use crate::colors;
use crate::error::Result;
use crate::specs::RECOGNIZED_KEYS;

/// One problem found in the tree, with the path that leads to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for Problem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Validate a whole specs document. An empty report means the tree is clean.
pub fn validate_specs(doc: &Value) -> Vec<Problem> {
    let mut problems = Vec::new();

    let Some(variables) = doc.as_mapping() else {
        problems.push(Problem {
            path: String::new(),
            message: "document root must be a mapping of variable names".to_string(),
        });
        return problems;
    };

    for (name, levels) in variables {
        let name = key_string(name);
        let Some(levels) = levels.as_mapping() else {
            problems.push(Problem {
                path: name,
                message: "variable entry must be a mapping of level keys".to_string(),
            });
            continue;
        };

        for (level_key, entry) in levels {
            let level_key = key_string(level_key);
            let path = format!("{name}.{level_key}");

            if Level::parse(&level_key).is_none() {
                problems.push(Problem {
                    path: path.clone(),
                    message: "level key matches no permitted pattern".to_string(),
                });
            }
            check_entry(&path, entry, &mut problems);
        }
    }

    problems
}

fn check_entry(path: &str, entry: &Value, problems: &mut Vec<Problem>) {
    let Some(entry) = entry.as_mapping() else {
        problems.push(Problem {
            path: path.to_string(),
            message: "definition must be a mapping".to_string(),
        });
        return;
    };

    if !entry.contains_key("grib_name") {
        problems.push(Problem {
            path: path.to_string(),
            message: "missing grib_name".to_string(),
        });
    }

    for (key, value) in entry {
        let key = key_string(key);
        let leaf = format!("{path}.{key}");

        if !RECOGNIZED_KEYS.contains(&key.as_str()) {
            problems.push(Problem {
                path: leaf,
                message: "unrecognized key".to_string(),
            });
            continue;
        }
        if let Err(message) = check_leaf(&key, value) {
            problems.push(Problem { path: leaf, message });
        }
    }
}

fn check_leaf(key: &str, value: &Value) -> std::result::Result<(), String> {
    match key {
        "grib_name" => match value.as_str() {
            Some(s) if !s.is_empty() => Ok(()),
            _ => Err("must be a non-empty string".to_string()),
        },
        "clevs" => {
            let spec: ClevSpec = serde_yaml::from_value(value.clone())
                .map_err(|_| "must be a list, range expression, or level-set name".to_string())?;
            spec.resolve().map(|_| ()).map_err(|e| e.to_string())
        }
        "cmap" => match value.as_str() {
            Some(name) if colors::is_colormap(name) => Ok(()),
            Some(name) => Err(format!("unknown color map {name}")),
            None => Err("must be a string".to_string()),
        },
        "colors" => check_colors(value),
        "ticks" => match value.as_u64() {
            Some(_) => Ok(()),
            None => Err("must be a non-negative integer".to_string()),
        },
        "transform" => match value.as_str() {
            Some(name) => Transform::from_name(name).map(|_| ()).map_err(|e| e.to_string()),
            None => Err("must be a string".to_string()),
        },
        "unit" => match value.as_str() {
            Some(s) if !s.is_empty() => Ok(()),
            _ => Err("must be a non-empty string".to_string()),
        },
        _ => Ok(()),
    }
}

fn check_colors(value: &Value) -> std::result::Result<(), String> {
    match value {
        Value::String(name) if colors::is_color_function(name) => Ok(()),
        Value::String(name) => Err(format!("unknown color function {name}")),
        Value::Sequence(items) => {
            for item in items {
                match item.as_str() {
                    Some(name) if colors::is_named_color(name) => {}
                    Some(name) => return Err(format!("unknown color {name}")),
                    None => return Err("color entries must be strings".to_string()),
                }
            }
            Ok(())
        }
        _ => Err("must be a color list or color function name".to_string()),
    }
}

/// Parse a specs file into its raw YAML tree for validation.
pub fn load_raw(path: impl AsRef<std::path::Path>) -> Result<Value> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&text)?)
}

fn key_string(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .unwrap_or_default()
            .trim()
            .to_string(),
    }
}
