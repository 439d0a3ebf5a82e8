//! Write payloads for the route store and their validation.
//!
//! These are the shapes the admin endpoints accept. Everything is
//! validated before it reaches the store, so stored stops have in-range
//! coordinates and stored schedules parse.

use serde::Deserialize;

use crate::domain::{Coordinate, DepartureAnchor, InvalidCoordinate, TimeError};

/// Rejected write payload.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} name must not be empty")]
    EmptyName(&'static str),

    #[error(transparent)]
    Coordinate(#[from] InvalidCoordinate),

    #[error("departure {departure:?}: {source}")]
    Departure {
        departure: String,
        #[source]
        source: TimeError,
    },

    #[error("frequency must be a positive number of minutes, got {0}")]
    Frequency(i64),
}

fn check_name(kind: &'static str, name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName(kind));
    }
    Ok(())
}

fn check_departure(departure: &str) -> Result<(), ValidationError> {
    DepartureAnchor::parse_hhmm(departure)
        .map(|_| ())
        .map_err(|source| ValidationError::Departure {
            departure: departure.to_string(),
            source,
        })
}

fn check_frequency(frequency_min: i64) -> Result<(), ValidationError> {
    if frequency_min <= 0 {
        return Err(ValidationError::Frequency(frequency_min));
    }
    Ok(())
}

/// A new stop.
#[derive(Debug, Clone, Deserialize)]
pub struct NewStop {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub order_index: i32,
}

impl NewStop {
    pub fn validate(&self) -> Result<Coordinate, ValidationError> {
        check_name("stop", &self.name)?;
        Ok(Coordinate::validated(self.latitude, self.longitude)?)
    }
}

/// A new schedule.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSchedule {
    /// "HH:MM"
    pub departure: String,
    pub frequency_min: i64,
}

impl NewSchedule {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_departure(&self.departure)?;
        check_frequency(self.frequency_min)
    }
}

/// A new route, optionally with its stops and schedules.
#[derive(Debug, Clone, Deserialize)]
pub struct NewRoute {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub stops: Vec<NewStop>,
    #[serde(default)]
    pub schedules: Vec<NewSchedule>,
}

impl NewRoute {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_name("route", &self.name)?;
        for stop in &self.stops {
            stop.validate()?;
        }
        for schedule in &self.schedules {
            schedule.validate()?;
        }
        Ok(())
    }
}

/// Partial update of a route's own fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoutePatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl RoutePatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            check_name("route", name)?;
        }
        Ok(())
    }
}

/// Partial update of a stop.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StopPatch {
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub order_index: Option<i32>,
}

impl StopPatch {
    /// Validate the fields being changed. Coordinates are range-checked
    /// individually; the merged pair is checked again when applied.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            check_name("stop", name)?;
        }
        if let Some(latitude) = self.latitude {
            Coordinate::validated(latitude, 0.0)?;
        }
        if let Some(longitude) = self.longitude {
            Coordinate::validated(0.0, longitude)?;
        }
        Ok(())
    }
}

/// Partial update of a schedule.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchedulePatch {
    pub departure: Option<String>,
    pub frequency_min: Option<i64>,
}

impl SchedulePatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(departure) = &self.departure {
            check_departure(departure)?;
        }
        if let Some(frequency_min) = self.frequency_min {
            check_frequency(frequency_min)?;
        }
        Ok(())
    }
}
