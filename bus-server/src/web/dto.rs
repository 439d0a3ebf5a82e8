//! Data transfer objects for web responses.
//!
//! Routes and forecasts serialise directly from their domain types; only
//! the envelopes that have no domain counterpart live here.

use serde::Serialize;

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Short, client-safe message
    pub error: String,
}

/// Acknowledgement for operations with nothing else to return.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub fn deleted() -> Self {
        Self { status: "deleted" }
    }
}
