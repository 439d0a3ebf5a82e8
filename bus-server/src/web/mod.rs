//! Web layer for the bus arrival service.
//!
//! Provides public endpoints for reading routes and forecasts, and admin
//! endpoints for editing routes, stops and schedules.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
