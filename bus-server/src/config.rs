//! Server configuration from environment variables.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::forecast::{ForecastConfig, InvalidForecastConfig};

/// Error returned when the environment holds an unusable setting.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{key}: cannot parse {value:?}")]
    Parse { key: &'static str, value: String },

    #[error(transparent)]
    Forecast(#[from] InvalidForecastConfig),
}

/// Runtime configuration for the server binary.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Address to listen on.
    pub addr: SocketAddr,

    /// Forecast window size and assumed speed.
    pub forecast: ForecastConfig,

    /// Insert the sample route into an empty store at startup.
    pub seed: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 8080)),
            forecast: ForecastConfig::default(),
            seed: true,
        }
    }
}

impl ServerConfig {
    /// Read `BUS_HOST`, `BUS_PORT`, `BUS_FORECAST_COUNT`,
    /// `BUS_AVERAGE_SPEED_KMH` and `BUS_SEED`, falling back to defaults
    /// for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host: IpAddr = parse_or(&lookup, "BUS_HOST", defaults.addr.ip())?;
        let port: u16 = parse_or(&lookup, "BUS_PORT", defaults.addr.port())?;
        let bus_count: usize =
            parse_or(&lookup, "BUS_FORECAST_COUNT", defaults.forecast.bus_count)?;
        let average_speed_kmh: f64 = parse_or(
            &lookup,
            "BUS_AVERAGE_SPEED_KMH",
            defaults.forecast.average_speed_kmh,
        )?;
        let seed: bool = parse_or(&lookup, "BUS_SEED", defaults.seed)?;

        Ok(Self {
            addr: SocketAddr::new(host, port),
            forecast: ForecastConfig::new(bus_count, average_speed_kmh)?,
            seed,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Parse { key, value }),
    }
}
