//! Route store error types.

use crate::domain::{RouteId, ScheduleId, StopId};

use super::input::ValidationError;

/// Errors returned by [`RouteStore`](super::RouteStore) operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("route {0} not found")]
    RouteNotFound(RouteId),

    #[error("stop {0} not found")]
    StopNotFound(StopId),

    #[error("schedule {0} not found")]
    ScheduleNotFound(ScheduleId),

    /// The write payload failed validation
    #[error("invalid input: {0}")]
    Invalid(#[from] ValidationError),
}
