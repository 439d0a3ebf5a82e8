//! Application state for the web layer.

use std::sync::Arc;

use crate::clock::Clock;
use crate::forecast::Forecaster;
use crate::store::RouteStore;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Routes, stops and schedules
    pub store: RouteStore,

    /// Forecast engine with the configured window and speed
    pub forecaster: Arc<Forecaster>,

    /// Source of "now" for forecasts
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(store: RouteStore, forecaster: Forecaster, clock: impl Clock + 'static) -> Self {
        Self {
            store,
            forecaster: Arc::new(forecaster),
            clock: Arc::new(clock),
        }
    }
}
