//! Geographic corner coordinates of a model grid.

use serde::{Deserialize, Serialize};

/// Lat/lon of the lower-left and upper-right grid corners.
///
/// Plotting code consumes these as map extents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridCorners {
    pub ll_lat: f64,
    pub ll_lon: f64,
    pub ur_lat: f64,
    pub ur_lon: f64,
}

impl GridCorners {
    pub fn new(ll_lat: f64, ll_lon: f64, ur_lat: f64, ur_lon: f64) -> Self {
        Self {
            ll_lat,
            ll_lon,
            ur_lat,
            ur_lon,
        }
    }

    /// Corner ordering expected by the plot driver: ll_lat, ur_lat, ll_lon, ur_lon.
    pub fn as_extent(&self) -> [f64; 4] {
        [self.ll_lat, self.ur_lat, self.ll_lon, self.ur_lon]
    }

    /// Width of the domain in degrees of longitude.
    pub fn lon_span(&self) -> f64 {
        self.ur_lon - self.ll_lon
    }

    /// Height of the domain in degrees of latitude.
    pub fn lat_span(&self) -> f64 {
        self.ur_lat - self.ll_lat
    }
}
