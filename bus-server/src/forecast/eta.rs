//! Arrival estimates along a route.

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

use crate::domain::{Stop, serialize_hhmm};

use super::distance::distance_km;
use super::error::ForecastError;

/// Estimated arrival of one bus at one stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StopEta {
    pub stop: String,

    #[serde(serialize_with = "serialize_hhmm")]
    pub eta: NaiveDateTime,
}

/// Travel time for `distance_km` at `speed_kmh`, rounded to the nearest
/// whole minute.
///
/// Returns `None` when the result does not fit in a [`Duration`].
pub fn travel_time(distance_km: f64, speed_kmh: f64) -> Option<Duration> {
    let minutes = (distance_km / speed_kmh * 60.0).round();
    if !minutes.is_finite() || minutes.abs() > i64::MAX as f64 {
        return None;
    }
    Duration::try_minutes(minutes as i64)
}

/// Walk `stops` in order from `departure`, adding each leg's travel time
/// at a constant `speed_kmh` to the previous stop's ETA.
///
/// The first stop's ETA is the departure itself. Every leg is rounded to
/// whole minutes on its own, so short legs can add nothing.
///
/// Fails with [`ForecastError::EtaOutOfRange`] when an arrival falls
/// outside the representable date range, which only a vanishingly small
/// speed can cause.
pub fn stop_etas(
    stops: &[&Stop],
    departure: NaiveDateTime,
    speed_kmh: f64,
) -> Result<Vec<StopEta>, ForecastError> {
    let mut etas = Vec::with_capacity(stops.len());
    let mut arrival = departure;
    let mut previous: Option<&Stop> = None;

    for &stop in stops {
        if let Some(prev) = previous {
            let leg = distance_km(prev.coordinate, stop.coordinate);
            arrival = travel_time(leg, speed_kmh)
                .and_then(|travel| arrival.checked_add_signed(travel))
                .ok_or(ForecastError::EtaOutOfRange)?;
        }
        etas.push(StopEta {
            stop: stop.name.clone(),
            eta: arrival,
        });
        previous = Some(stop);
    }

    Ok(etas)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::{Coordinate, StopId};
    use chrono::NaiveDate;
    use proptest::prelude::*;

    prop_compose! {
        fn any_stop()(
            lat in -60.0f64..60.0,
            lon in -180.0f64..180.0,
            order_index in 0i32..100
        ) -> Stop {
            Stop {
                id: StopId(order_index as u64),
                name: format!("stop-{order_index}"),
                coordinate: Coordinate::new(lat, lon),
                order_index,
            }
        }
    }

    proptest! {
        /// One ETA per stop, first at departure, never decreasing
        #[test]
        fn etas_follow_stops(
            stops in prop::collection::vec(any_stop(), 0..12),
            speed in 1.0f64..120.0,
            minute in 0u32..1440
        ) {
            let departure = NaiveDate::from_ymd_opt(2024, 3, 15)
                .unwrap()
                .and_hms_opt(minute / 60, minute % 60, 0)
                .unwrap();
            let refs: Vec<&Stop> = stops.iter().collect();
            let etas = stop_etas(&refs, departure, speed).unwrap();

            prop_assert_eq!(etas.len(), stops.len());
            if let Some(first) = etas.first() {
                prop_assert_eq!(first.eta, departure);
            }
            for pair in etas.windows(2) {
                prop_assert!(pair[1].eta >= pair[0].eta);
            }
            for (eta, stop) in etas.iter().zip(&stops) {
                prop_assert_eq!(&eta.stop, &stop.name);
            }
        }
    }
}
