//! Bus arrival forecasting.
//!
//! Given a route and the current local time, works out when the next bus
//! leaves, lists a fixed window of departures, and estimates when each of
//! those buses reaches every stop:
//!
//! - [`distance_km`] measures each leg along the great circle
//! - [`Headway`] turns a schedule's anchor and frequency into departures
//! - [`stop_etas`] accumulates travel time stop by stop at a constant speed
//! - [`Forecaster`] puts these together into a [`Forecast`]
//!
//! Nothing here reads the clock or touches storage; callers pass `now`.

mod assemble;
mod config;
mod departures;
mod distance;
mod error;
mod eta;

pub use assemble::{BusForecast, Forecast, Forecaster};
pub use config::{ForecastConfig, InvalidForecastConfig};
pub use departures::{Headway, forecast_departures, next_departure};
pub use distance::{EARTH_RADIUS_KM, distance_km};
pub use error::ForecastError;
pub use eta::{StopEta, stop_etas, travel_time};
