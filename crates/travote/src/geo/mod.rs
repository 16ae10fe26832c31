//! Coordinates and bounding-box query construction.
//!
//! Places store their position as two independent columns, so a "search around a
//! point" has to be expressed as plain range clauses the storage layer can evaluate.
//! [`BoundingBoxFilterBuilder`] does that translation, clamping latitude at the poles
//! and splitting longitude into two ranges when the box crosses the antimeridian.

use std::fmt;

use thiserror::Error;

mod bbox;

pub use bbox::{
    BoundingBoxFilterBuilder, BoundingBoxQuery, DEFAULT_RESULT_LIMIT, LongitudeSpan, NormalizedRange,
};

pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

pub const MIN_LONG: f64 = -180.0;
pub const MAX_LONG: f64 = 180.0;

/// Full turn of longitude.
const LONG_PERIOD: f64 = 360.0;

/// Rejection of a query before any storage access happens.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidInput {
    #[error("radius must be a non-negative number of degrees, got {0}")]
    Radius(f64),
    #[error("result limit must be positive, got {0}")]
    Limit(i64),
    #[error("latitude must be within [-90, 90], got {0}")]
    Latitude(f64),
    #[error("longitude must be within [-180, 180], got {0}")]
    Longitude(f64),
    #[error("range on {field} is inverted: [{low}, {high}]")]
    InvertedRange {
        field: &'static str,
        low: f64,
        high: f64,
    },
}

/// Check a requested result limit is positive and convert it for the executor.
pub fn result_limit(limit: i64) -> Result<usize, InvalidInput> {
    if limit <= 0 {
        return Err(InvalidInput::Limit(limit));
    }
    usize::try_from(limit).map_err(|_| InvalidInput::Limit(limit))
}

/// A position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
}

impl Point {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check both coordinates lie inside their valid ranges.
    pub fn validate(&self) -> Result<(), InvalidInput> {
        if !(MIN_LAT..=MAX_LAT).contains(&self.latitude) {
            return Err(InvalidInput::Latitude(self.latitude));
        }
        if !(MIN_LONG..=MAX_LONG).contains(&self.longitude) {
            return Err(InvalidInput::Longitude(self.longitude));
        }
        Ok(())
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}
