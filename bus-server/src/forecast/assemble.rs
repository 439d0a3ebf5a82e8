//! Forecast assembly: one route, one instant, one response record.

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

use crate::domain::{Route, RouteId, Stop, serialize_hhmm};

use super::config::ForecastConfig;
use super::departures::Headway;
use super::error::ForecastError;
use super::eta::{StopEta, stop_etas};

/// One upcoming bus and its arrival estimate at every stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BusForecast {
    #[serde(serialize_with = "serialize_hhmm")]
    pub departure: NaiveDateTime,

    pub etas: Vec<StopEta>,
}

/// The forecast for a route as seen at `current_time`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Forecast {
    pub route_id: RouteId,

    pub route_name: String,

    #[serde(serialize_with = "serialize_hhmm")]
    pub current_time: NaiveDateTime,

    #[serde(serialize_with = "serialize_hhmm")]
    pub next_bus: NaiveDateTime,

    /// Schedule interval, written as "<n> min".
    #[serde(rename = "frequency", serialize_with = "serialize_frequency")]
    pub frequency_min: i64,

    /// Forecast window in departure order, starting at today's anchor.
    pub buses: Vec<BusForecast>,
}

fn serialize_frequency<S: Serializer>(minutes: &i64, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&format_args!("{minutes} min"))
}

/// Computes forecasts with a fixed configuration.
///
/// Holds no state between calls; the same route and instant always give
/// the same forecast.
#[derive(Debug, Clone, Default)]
pub struct Forecaster {
    config: ForecastConfig,
}

impl Forecaster {
    pub fn new(config: ForecastConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Forecast the route's first schedule as of `now`.
    ///
    /// Only the first schedule in stored order is used.
    pub fn forecast(&self, route: &Route, now: NaiveDateTime) -> Result<Forecast, ForecastError> {
        let schedule = route.primary_schedule().ok_or(ForecastError::NoSchedule)?;
        let headway = Headway::from_schedule(schedule)?;

        let next_bus = headway.next_departure(now)?;
        let departures = headway.forecast_departures(now, self.config.bus_count)?;

        let stops: Vec<&Stop> = route.ordered_stops();
        let buses = departures
            .into_iter()
            .map(|departure| {
                Ok(BusForecast {
                    departure,
                    etas: stop_etas(&stops, departure, self.config.average_speed_kmh)?,
                })
            })
            .collect::<Result<Vec<_>, ForecastError>>()?;

        tracing::debug!(
            route = %route.id,
            anchor = %headway.anchor(),
            frequency_min = headway.frequency_min(),
            stops = stops.len(),
            "computed forecast"
        );

        Ok(Forecast {
            route_id: route.id,
            route_name: route.name.clone(),
            current_time: now,
            next_bus,
            frequency_min: headway.frequency_min(),
            buses,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinate, Schedule, ScheduleId, StopId, format_hhmm};
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn schedule(departure: &str, frequency_min: i64) -> Schedule {
        Schedule {
            id: ScheduleId(1),
            departure: departure.to_string(),
            frequency_min,
        }
    }

    fn stop(id: u64, name: &str, lat: f64, lon: f64, order_index: i32) -> Stop {
        Stop {
            id: StopId(id),
            name: name.to_string(),
            coordinate: Coordinate::new(lat, lon),
            order_index,
        }
    }

    fn route(stops: Vec<Stop>, schedules: Vec<Schedule>) -> Route {
        Route {
            id: RouteId(1),
            name: "Yaba–Ikeja".to_string(),
            description: String::new(),
            stops,
            schedules,
        }
    }

    fn sample_route() -> Route {
        route(
            vec![
                stop(1, "Yaba", 6.5086, 3.3747, 1),
                stop(2, "Ojuelegba", 6.5095, 3.3664, 2),
                stop(3, "Maryland", 6.5480, 3.3632, 3),
                stop(4, "Ikeja", 6.6014, 3.3515, 4),
            ],
            vec![schedule("06:30", 30), schedule("07:00", 30)],
        )
    }

    fn departures(forecast: &Forecast) -> Vec<String> {
        forecast
            .buses
            .iter()
            .map(|b| format_hhmm(b.departure))
            .collect()
    }

    #[test]
    fn before_first_bus() {
        let forecast = Forecaster::default()
            .forecast(&sample_route(), at(6, 10))
            .unwrap();

        assert_eq!(format_hhmm(forecast.next_bus), "06:30");
        assert_eq!(departures(&forecast), vec!["06:30", "07:00", "07:30", "08:00"]);
    }

    #[test]
    fn window_includes_departed_buses() {
        let forecast = Forecaster::default()
            .forecast(&sample_route(), at(6, 45))
            .unwrap();

        assert_eq!(format_hhmm(forecast.next_bus), "07:00");
        assert_eq!(departures(&forecast), vec!["06:30", "07:00", "07:30", "08:00"]);
    }

    #[test]
    fn etas_per_bus() {
        let forecast = Forecaster::default()
            .forecast(&sample_route(), at(6, 10))
            .unwrap();

        let second = &forecast.buses[1];
        let etas: Vec<_> = second
            .etas
            .iter()
            .map(|e| (e.stop.as_str(), format_hhmm(e.eta)))
            .collect();
        assert_eq!(
            etas,
            vec![
                ("Yaba", "07:00".to_string()),
                ("Ojuelegba", "07:02".to_string()),
                ("Maryland", "07:12".to_string()),
                ("Ikeja", "07:27".to_string()),
            ]
        );
    }

    #[test]
    fn stops_traversed_in_order_index() {
        let mut r = sample_route();
        r.stops.reverse();
        let forecast = Forecaster::default().forecast(&r, at(6, 10)).unwrap();
        let names: Vec<_> = forecast.buses[0]
            .etas
            .iter()
            .map(|e| e.stop.as_str())
            .collect();
        assert_eq!(names, vec!["Yaba", "Ojuelegba", "Maryland", "Ikeja"]);
    }

    #[test]
    fn only_first_schedule_is_used() {
        let forecast = Forecaster::default()
            .forecast(&sample_route(), at(6, 10))
            .unwrap();
        assert_eq!(format_hhmm(forecast.buses[0].departure), "06:30");
    }

    #[test]
    fn route_without_stops_has_empty_etas() {
        let r = route(vec![], vec![schedule("06:30", 30)]);
        let forecast = Forecaster::default().forecast(&r, at(9, 0)).unwrap();

        assert_eq!(forecast.buses.len(), 4);
        assert!(forecast.buses.iter().all(|b| b.etas.is_empty()));
    }

    #[test]
    fn route_without_schedules() {
        let r = route(vec![stop(1, "Yaba", 6.5086, 3.3747, 1)], vec![]);
        assert_eq!(
            Forecaster::default().forecast(&r, at(9, 0)),
            Err(ForecastError::NoSchedule)
        );
    }

    #[test]
    fn bad_schedules_propagate() {
        let r = route(vec![], vec![schedule("6.30", 30)]);
        assert!(matches!(
            Forecaster::default().forecast(&r, at(9, 0)),
            Err(ForecastError::MalformedSchedule { .. })
        ));

        let r = route(vec![], vec![schedule("06:30", 0)]);
        assert_eq!(
            Forecaster::default().forecast(&r, at(9, 0)),
            Err(ForecastError::InvalidFrequency(0))
        );
    }

    #[test]
    fn configured_count_and_speed() {
        let config = ForecastConfig::new(2, 50.0).unwrap();
        let forecast = Forecaster::new(config)
            .forecast(&sample_route(), at(6, 10))
            .unwrap();

        assert_eq!(forecast.buses.len(), 2);
        // The 2.2 min first leg takes 1.1 min, rounded to 1.
        assert_eq!(format_hhmm(forecast.buses[0].etas[1].eta), "06:31");
    }

    #[test]
    fn crawling_speed_fails_instead_of_overflowing() {
        let config = ForecastConfig::new(4, 1e-9).unwrap();
        assert_eq!(
            Forecaster::new(config).forecast(&sample_route(), at(6, 10)),
            Err(ForecastError::EtaOutOfRange)
        );
    }

    #[test]
    fn json_shape() {
        let r = route(
            vec![
                stop(1, "Yaba", 6.5086, 3.3747, 1),
                stop(2, "Ojuelegba", 6.5095, 3.3664, 2),
            ],
            vec![schedule("06:30", 30)],
        );
        let forecast = Forecaster::new(ForecastConfig::new(2, 25.0).unwrap())
            .forecast(&r, at(6, 45))
            .unwrap();

        assert_eq!(
            serde_json::to_value(&forecast).unwrap(),
            serde_json::json!({
                "route_id": 1,
                "route_name": "Yaba–Ikeja",
                "current_time": "06:45",
                "next_bus": "07:00",
                "frequency": "30 min",
                "buses": [
                    {
                        "departure": "06:30",
                        "etas": [
                            {"stop": "Yaba", "eta": "06:30"},
                            {"stop": "Ojuelegba", "eta": "06:32"}
                        ]
                    },
                    {
                        "departure": "07:00",
                        "etas": [
                            {"stop": "Yaba", "eta": "07:00"},
                            {"stop": "Ojuelegba", "eta": "07:02"}
                        ]
                    }
                ]
            })
        );
    }

    #[test]
    fn identical_inputs_identical_output() {
        let forecaster = Forecaster::default();
        let route = sample_route();
        let a = serde_json::to_string(&forecaster.forecast(&route, at(7, 14)).unwrap()).unwrap();
        let b = serde_json::to_string(&forecaster.forecast(&route, at(7, 14)).unwrap()).unwrap();
        assert_eq!(a, b);
    }
}
