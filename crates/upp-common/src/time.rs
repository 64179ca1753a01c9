//! Time handling for model output.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A model run time paired with a forecast-hour offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidTime {
    /// Analysis/reference time of the model run.
    pub reference_time: DateTime<Utc>,
    /// Forecast hour offset from the reference time.
    pub forecast_hour: u32,
}

impl ValidTime {
    pub fn new(reference_time: DateTime<Utc>, forecast_hour: u32) -> Self {
        Self {
            reference_time,
            forecast_hour,
        }
    }

    /// The analysis time (forecast hour zero).
    pub fn analysis(reference_time: DateTime<Utc>) -> Self {
        Self {
            reference_time,
            forecast_hour: 0,
        }
    }

    /// The time this forecast is valid for.
    pub fn valid_datetime(&self) -> DateTime<Utc> {
        self.reference_time + Duration::hours(self.forecast_hour as i64)
    }
}

/// Format a timestamp for a graphic title, e.g. `20201205 12 UTC`.
pub fn title_format(dt: DateTime<Utc>) -> String {
    dt.format("%Y%m%d %H UTC").to_string()
}
