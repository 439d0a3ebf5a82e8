//! Routes, their stops and their schedules.

use serde::{Deserialize, Serialize};

use super::{Coordinate, RouteId, ScheduleId, StopId};

/// A stop on a route.
///
/// A stop belongs to exactly one route; two routes serving the same street
/// corner each hold their own stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: StopId,

    pub name: String,

    #[serde(flatten)]
    pub coordinate: Coordinate,

    /// Position within the route. Values need not be contiguous.
    pub order_index: i32,
}

/// A periodic departure pattern.
///
/// `departure` is kept as the stored "HH:MM" text. It is parsed when a
/// forecast is computed so that a bad value surfaces as a forecast error
/// rather than making the whole route unreadable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: ScheduleId,

    /// First departure of the day, "HH:MM".
    pub departure: String,

    /// Minutes between consecutive departures.
    pub frequency_min: i64,
}

/// A bus route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: RouteId,

    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    pub stops: Vec<Stop>,

    pub schedules: Vec<Schedule>,
}

impl Route {
    /// Stops in traversal order: `order_index` ascending, ties in
    /// insertion order.
    pub fn ordered_stops(&self) -> Vec<&Stop> {
        let mut stops: Vec<&Stop> = self.stops.iter().collect();
        stops.sort_by_key(|s| s.order_index);
        stops
    }

    /// Sort the owned stops into traversal order in place.
    pub fn sort_stops(&mut self) {
        self.stops.sort_by_key(|s| s.order_index);
    }

    /// The schedule used for forecasting: the first one in stored order.
    pub fn primary_schedule(&self) -> Option<&Schedule> {
        self.schedules.first()
    }
}
