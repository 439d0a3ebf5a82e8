//! Route storage.
//!
//! Holds routes, stops and schedules in memory for the lifetime of the
//! process. The forecasting code only ever sees snapshots taken from here.

mod error;
mod input;
mod routes;
mod seed;

pub use error::StoreError;
pub use input::{
    NewRoute, NewSchedule, NewStop, RoutePatch, SchedulePatch, StopPatch, ValidationError,
};
pub use routes::RouteStore;
pub use seed::{sample_route, seed_sample_data};
