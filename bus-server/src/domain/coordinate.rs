//! Geographic coordinates for stops.

use serde::{Deserialize, Serialize};

/// Error returned when a coordinate is outside the valid degree range.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidCoordinate {
    #[error("latitude {0} is outside -90..90")]
    Latitude(f64),

    #[error("longitude {0} is outside -180..180")]
    Longitude(f64),
}

/// A WGS84 position in decimal degrees.
///
/// Construction does not range-check, so the forecasting code accepts
/// whatever the store holds. Use [`Coordinate::validated`] at ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate without range checks.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Create a coordinate, rejecting out-of-range or non-finite values.
    ///
    /// # Examples
    ///
    /// ```
    /// use bus_server::domain::Coordinate;
    ///
    /// assert!(Coordinate::validated(6.5086, 3.3747).is_ok());
    /// assert!(Coordinate::validated(91.0, 0.0).is_err());
    /// assert!(Coordinate::validated(0.0, -180.5).is_err());
    /// ```
    pub fn validated(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinate> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(InvalidCoordinate::Latitude(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(InvalidCoordinate::Longitude(longitude));
        }
        Ok(Self::new(latitude, longitude))
    }
}
