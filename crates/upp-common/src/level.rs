//! Lexing of level strings used as configuration keys.
//!
//! Level keys come in three shapes:
//!
//! - bare descriptor: `sfc`, `max`, `mup`
//! - numeric + unit suffix: `500mb`, `2m`
//! - stat prefix + numeric: `mn02`, `mx25`

/// Vertical level descriptors with no numeric part.
pub const DESCRIPTORS: &[&str] = &[
    "esbl", "esblmn", "max", "maxsfc", "mdn", "mnsfc", "mup", "sfc", "ua",
];

/// Stat prefixes allowed in `statNN` keys.
pub const STAT_PREFIXES: &[&str] = &["in", "m", "maxm", "mn", "mx"];

/// Unit suffix of a numeric level key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelUnit {
    /// Centimeters, e.g. soil depths.
    Cm,
    /// Layer difference.
    Ds,
    /// Meters above ground.
    M,
    /// Millibars (isobaric surface).
    Mb,
}

impl LevelUnit {
    pub fn from_suffix(s: &str) -> Option<Self> {
        match s {
            "cm" => Some(LevelUnit::Cm),
            "ds" => Some(LevelUnit::Ds),
            "m" => Some(LevelUnit::M),
            "mb" => Some(LevelUnit::Mb),
            _ => None,
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            LevelUnit::Cm => "cm",
            LevelUnit::Ds => "ds",
            LevelUnit::M => "m",
            LevelUnit::Mb => "mb",
        }
    }

    /// Pressure units are stored in Pa in GRIB level coordinates.
    pub fn is_pressure(&self) -> bool {
        matches!(self, LevelUnit::Mb)
    }
}

/// A parsed level key.
#[derive(Debug, Clone, PartialEq)]
pub enum Level {
    /// Bare descriptor, e.g. `sfc`.
    Descriptor(String),
    /// Numeric magnitude with a unit suffix, e.g. `500mb`.
    NumericUnit { value: f64, unit: LevelUnit },
    /// Stat prefix with a numeric tail, e.g. `mx25`.
    StatNumeric { stat: String, value: f64 },
}

impl Level {
    /// Parse a level key, returning `None` when it fits none of the
    /// permitted shapes.
    pub fn parse(key: &str) -> Option<Level> {
        if DESCRIPTORS.contains(&key) {
            return Some(Level::Descriptor(key.to_string()));
        }

        // numeric + unit: digit run followed by a unit suffix
        if key.starts_with(|c: char| c.is_ascii_digit()) {
            let split = key.find(|c: char| !c.is_ascii_digit()).unwrap_or(key.len());
            let (num, suffix) = key.split_at(split);
            let unit = LevelUnit::from_suffix(suffix)?;
            let value = num.parse::<f64>().ok()?;
            return Some(Level::NumericUnit { value, unit });
        }

        // stat + numeric: letter run followed by a digit run
        if key.starts_with(|c: char| c.is_ascii_alphabetic()) {
            let split = key.find(|c: char| c.is_ascii_digit())?;
            let (stat, num) = key.split_at(split);
            if !STAT_PREFIXES.contains(&stat) || !num.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            let value = num.parse::<f64>().ok()?;
            return Some(Level::StatNumeric {
                stat: stat.to_string(),
                value,
            });
        }

        None
    }

    /// The target value on a GRIB vertical coordinate, with pressure levels
    /// scaled from mb to Pa.
    pub fn coordinate_value(&self) -> Option<f64> {
        match self {
            Level::Descriptor(_) => None,
            Level::NumericUnit { value, unit } => {
                if unit.is_pressure() {
                    Some(value * 100.0)
                } else {
                    Some(*value)
                }
            }
            Level::StatNumeric { value, .. } => Some(*value),
        }
    }
}

/// Split a level key into its numeric magnitude and letter run, regardless
/// of their order in the key.
pub fn split_numeric(key: &str) -> (Option<f64>, String) {
    let digits: String = key.chars().filter(|c| c.is_ascii_digit()).collect();
    let letters: String = key.chars().filter(|c| c.is_ascii_alphabetic()).collect();
    let value = if digits.is_empty() {
        None
    } else {
        digits.parse::<f64>().ok()
    };
    (value, letters)
}
