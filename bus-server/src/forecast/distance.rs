//! Great-circle distance between stops.

use crate::domain::Coordinate;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometres between two coordinates.
///
/// Inputs are not range-checked.
///
/// # Examples
///
/// ```
/// use bus_server::domain::Coordinate;
/// use bus_server::forecast::distance_km;
///
/// let yaba = Coordinate::new(6.5086, 3.3747);
/// let ojuelegba = Coordinate::new(6.5095, 3.3664);
///
/// let d = distance_km(yaba, ojuelegba);
/// assert!((d - 0.92).abs() < 0.05);
/// assert_eq!(distance_km(yaba, yaba), 0.0);
/// ```
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push h a hair past 1 for antipodal points.
    let c = 2.0 * h.min(1.0).sqrt().asin();

    EARTH_RADIUS_KM * c
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    prop_compose! {
        fn any_coord()(lat in -90.0f64..=90.0, lon in -180.0f64..=180.0) -> Coordinate {
            Coordinate::new(lat, lon)
        }
    }

    proptest! {
        #[test]
        fn symmetric(a in any_coord(), b in any_coord()) {
            prop_assert_eq!(distance_km(a, b), distance_km(b, a));
        }

        #[test]
        fn zero_to_self(a in any_coord()) {
            prop_assert_eq!(distance_km(a, a), 0.0);
        }

        #[test]
        fn non_negative_and_bounded(a in any_coord(), b in any_coord()) {
            let d = distance_km(a, b);
            prop_assert!(d >= 0.0);
            prop_assert!(d <= std::f64::consts::PI * EARTH_RADIUS_KM + 1e-3);
        }

        /// Going via a midpoint is never meaningfully shorter than going direct
        #[test]
        fn triangle_inequality(a in any_coord(), b in any_coord(), c in any_coord()) {
            let direct = distance_km(a, c);
            let via = distance_km(a, b) + distance_km(b, c);
            prop_assert!(direct <= via + 1e-3);
        }
    }
}
