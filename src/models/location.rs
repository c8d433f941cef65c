//! Geographic coordinate model and distance helpers

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dynamics::PredictionError;

/// A point in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance in meters (mean earth radius 6371 km)
    #[must_use]
    pub fn distance_meters(&self, other: &Coordinate) -> f64 {
        haversine::distance(
            haversine::Location {
                latitude: self.latitude,
                longitude: self.longitude,
            },
            haversine::Location {
                latitude: other.latitude,
                longitude: other.longitude,
            },
            haversine::Units::Kilometers,
        ) * 1000.0
    }

    /// Format as the `"lat,lon"` string the predictor accepts
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4},{:.4}", self.latitude, self.longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

impl FromStr for Coordinate {
    type Err = PredictionError;

    /// Parses `"lat,lon"`; whitespace around either part is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_error = || PredictionError::coordinate_parse(s);

        let (lat, lon) = s.split_once(',').ok_or_else(parse_error)?;
        let latitude: f64 = lat.trim().parse().map_err(|_| parse_error())?;
        let longitude: f64 = lon.trim().parse().map_err(|_| parse_error())?;

        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(parse_error());
        }

        Ok(Self::new(latitude, longitude))
    }
}
