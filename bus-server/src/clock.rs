//! Source of the current local time.
//!
//! Handlers ask a [`Clock`] for "now" and pass the value down, so the
//! forecasting code never reads the system clock itself.

use chrono::{Local, NaiveDateTime};

/// Trait for reading the current local wall-clock time.
///
/// This abstraction allows handlers to be tested at a fixed instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// The process's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
