//! Domain types for the bus arrival service.
//!
//! Routes, stops and schedules as the store holds them, plus the small
//! value types (ids, coordinates, time-of-day anchors) they are built from.

mod coordinate;
mod ids;
mod route;
mod time;

pub use coordinate::{Coordinate, InvalidCoordinate};
pub use ids::{RouteId, ScheduleId, StopId};
pub use route::{Route, Schedule, Stop};
pub use time::{DepartureAnchor, TimeError, format_hhmm, serialize_hhmm};
