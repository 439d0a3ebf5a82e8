//! Sample data for a fresh store.

use super::error::StoreError;
use super::input::{NewRoute, NewSchedule, NewStop};
use super::routes::RouteStore;

fn stop(name: &str, latitude: f64, longitude: f64, order_index: i32) -> NewStop {
    NewStop {
        name: name.to_string(),
        latitude,
        longitude,
        order_index,
    }
}

fn schedule(departure: &str, frequency_min: i64) -> NewSchedule {
    NewSchedule {
        departure: departure.to_string(),
        frequency_min,
    }
}

/// The Yaba–Ikeja sample route.
pub fn sample_route() -> NewRoute {
    NewRoute {
        name: "Yaba–Ikeja".to_string(),
        description: "Sample route via Ojuelegba and Maryland".to_string(),
        stops: vec![
            stop("Yaba", 6.5086, 3.3747, 1),
            stop("Ojuelegba", 6.5095, 3.3664, 2),
            stop("Maryland", 6.5480, 3.3632, 3),
            stop("Ikeja", 6.6014, 3.3515, 4),
        ],
        schedules: vec![schedule("06:30", 30), schedule("07:00", 30)],
    }
}

/// Insert the sample route if the store has no routes.
///
/// Returns whether anything was inserted.
pub async fn seed_sample_data(store: &RouteStore) -> Result<bool, StoreError> {
    if !store.is_empty().await {
        return Ok(false);
    }
    let route = store.create_route(sample_route()).await?;
    tracing::info!(route = %route.id, name = %route.name, "seeded sample route");
    Ok(true)
}
