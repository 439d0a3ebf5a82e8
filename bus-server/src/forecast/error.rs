//! Forecast error types.
//!
//! Every failure here is deterministic for a given route and instant,
//! so none of them is worth retrying without fixing the stored data.

use crate::domain::TimeError;

/// Reasons a forecast cannot be produced for a route.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ForecastError {
    /// The route owns no schedule to forecast from
    #[error("no schedules for this route")]
    NoSchedule,

    /// The schedule's departure anchor is not "HH:MM"
    #[error("malformed schedule departure {departure:?}: {source}")]
    MalformedSchedule {
        departure: String,
        #[source]
        source: TimeError,
    },

    /// The schedule's frequency is not a usable positive number of minutes
    #[error("invalid schedule frequency: {0} min")]
    InvalidFrequency(i64),

    /// An arrival estimate fell outside the representable date range
    #[error("arrival estimate out of range")]
    EtaOutOfRange,
}
