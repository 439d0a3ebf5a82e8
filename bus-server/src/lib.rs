//! Bus arrival forecasting server.
//!
//! A web application that answers: "when is the next bus on this route,
//! and when will it reach each stop?"

pub mod clock;
pub mod config;
pub mod domain;
pub mod forecast;
pub mod store;
pub mod web;
