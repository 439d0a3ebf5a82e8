//! Forecast configuration.

/// Error returned when a forecast configuration is unusable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidForecastConfig {
    #[error("bus count must be at least 1")]
    ZeroBusCount,

    #[error("average speed must be a positive number of km/h, got {0}")]
    NonPositiveSpeed(f64),
}

/// Parameters shared by every forecast the service computes.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastConfig {
    /// Number of departures in the forecast window.
    pub bus_count: usize,

    /// Assumed average bus speed between stops (km/h).
    /// Not derived from traffic data.
    pub average_speed_kmh: f64,
}

impl ForecastConfig {
    /// Create a new configuration, rejecting unusable values.
    pub fn new(bus_count: usize, average_speed_kmh: f64) -> Result<Self, InvalidForecastConfig> {
        let config = Self {
            bus_count,
            average_speed_kmh,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the forecasting code relies on.
    pub fn validate(&self) -> Result<(), InvalidForecastConfig> {
        if self.bus_count == 0 {
            return Err(InvalidForecastConfig::ZeroBusCount);
        }
        if !self.average_speed_kmh.is_finite() || self.average_speed_kmh <= 0.0 {
            return Err(InvalidForecastConfig::NonPositiveSpeed(
                self.average_speed_kmh,
            ));
        }
        Ok(())
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            bus_count: 4,
            average_speed_kmh: 25.0,
        }
    }
}
