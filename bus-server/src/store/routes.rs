//! In-memory route store.

use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::{Coordinate, Route, RouteId, Schedule, ScheduleId, Stop, StopId};

use super::error::StoreError;
use super::input::{NewRoute, NewSchedule, NewStop, RoutePatch, SchedulePatch, StopPatch};

#[derive(Debug, Default)]
struct Tables {
    /// Stops are kept in insertion order; readers get them sorted.
    routes: BTreeMap<RouteId, Route>,
    last_route: u64,
    last_stop: u64,
    last_schedule: u64,
}

impl Tables {
    fn next_route_id(&mut self) -> RouteId {
        self.last_route += 1;
        RouteId(self.last_route)
    }

    fn next_stop_id(&mut self) -> StopId {
        self.last_stop += 1;
        StopId(self.last_stop)
    }

    fn next_schedule_id(&mut self) -> ScheduleId {
        self.last_schedule += 1;
        ScheduleId(self.last_schedule)
    }

    fn route_mut(&mut self, id: RouteId) -> Result<&mut Route, StoreError> {
        self.routes.get_mut(&id).ok_or(StoreError::RouteNotFound(id))
    }

    fn stop_mut(&mut self, id: StopId) -> Result<&mut Stop, StoreError> {
        self.routes
            .values_mut()
            .flat_map(|r| r.stops.iter_mut())
            .find(|s| s.id == id)
            .ok_or(StoreError::StopNotFound(id))
    }

    fn schedule_mut(&mut self, id: ScheduleId) -> Result<&mut Schedule, StoreError> {
        self.routes
            .values_mut()
            .flat_map(|r| r.schedules.iter_mut())
            .find(|s| s.id == id)
            .ok_or(StoreError::ScheduleNotFound(id))
    }

    fn build_stop(&mut self, stop: NewStop) -> Result<Stop, StoreError> {
        let coordinate = stop.validate()?;
        Ok(Stop {
            id: self.next_stop_id(),
            name: stop.name,
            coordinate,
            order_index: stop.order_index,
        })
    }

    fn build_schedule(&mut self, schedule: NewSchedule) -> Result<Schedule, StoreError> {
        schedule.validate()?;
        Ok(Schedule {
            id: self.next_schedule_id(),
            departure: schedule.departure,
            frequency_min: schedule.frequency_min,
        })
    }
}

/// Snapshot of a route with stops in traversal order.
fn snapshot(route: &Route) -> Route {
    let mut route = route.clone();
    route.sort_stops();
    route
}

/// Thread-safe store of routes and everything they own.
///
/// Cloning is cheap; clones share the same tables. Routes handed out are
/// snapshots, so callers never hold the lock while they work.
#[derive(Clone, Default)]
pub struct RouteStore {
    inner: Arc<RwLock<Tables>>,
}

impl RouteStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// All routes, ordered by id.
    pub async fn list_routes(&self) -> Vec<Route> {
        let guard = self.inner.read().await;
        guard.routes.values().map(snapshot).collect()
    }

    /// Number of routes in the store.
    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        let guard = self.inner.read().await;
        guard.routes.len()
    }

    /// Check if the store holds no routes.
    pub async fn is_empty(&self) -> bool {
        let guard = self.inner.read().await;
        guard.routes.is_empty()
    }

    /// Look up one route.
    pub async fn get_route(&self, id: RouteId) -> Result<Route, StoreError> {
        let guard = self.inner.read().await;
        guard
            .routes
            .get(&id)
            .map(snapshot)
            .ok_or(StoreError::RouteNotFound(id))
    }

    /// Create a route together with any stops and schedules it carries.
    ///
    /// Nothing is stored if any part fails validation.
    pub async fn create_route(&self, new: NewRoute) -> Result<Route, StoreError> {
        new.validate()?;

        let mut guard = self.inner.write().await;
        let id = guard.next_route_id();
        let stops = new
            .stops
            .into_iter()
            .map(|s| guard.build_stop(s))
            .collect::<Result<Vec<_>, _>>()?;
        let schedules = new
            .schedules
            .into_iter()
            .map(|s| guard.build_schedule(s))
            .collect::<Result<Vec<_>, _>>()?;

        let route = Route {
            id,
            name: new.name,
            description: new.description,
            stops,
            schedules,
        };
        let view = snapshot(&route);
        guard.routes.insert(id, route);
        Ok(view)
    }

    /// Change a route's name or description.
    pub async fn update_route(&self, id: RouteId, patch: RoutePatch) -> Result<Route, StoreError> {
        patch.validate()?;

        let mut guard = self.inner.write().await;
        let route = guard.route_mut(id)?;
        if let Some(name) = patch.name {
            route.name = name;
        }
        if let Some(description) = patch.description {
            route.description = description;
        }
        Ok(snapshot(route))
    }

    /// Remove a route and everything it owns.
    pub async fn delete_route(&self, id: RouteId) -> Result<Route, StoreError> {
        let mut guard = self.inner.write().await;
        guard
            .routes
            .remove(&id)
            .ok_or(StoreError::RouteNotFound(id))
    }

    /// Append a stop to a route.
    pub async fn add_stop(&self, route_id: RouteId, new: NewStop) -> Result<Stop, StoreError> {
        let mut guard = self.inner.write().await;
        // Check the route first so a missing route wins over an id bump.
        guard.route_mut(route_id)?;
        let stop = guard.build_stop(new)?;
        guard.route_mut(route_id)?.stops.push(stop.clone());
        Ok(stop)
    }

    /// Change fields of a stop.
    pub async fn update_stop(&self, id: StopId, patch: StopPatch) -> Result<Stop, StoreError> {
        patch.validate()?;

        let mut guard = self.inner.write().await;
        let stop = guard.stop_mut(id)?;
        let coordinate = Coordinate::validated(
            patch.latitude.unwrap_or(stop.coordinate.latitude),
            patch.longitude.unwrap_or(stop.coordinate.longitude),
        )
        .map_err(|e| StoreError::Invalid(e.into()))?;

        if let Some(name) = patch.name {
            stop.name = name;
        }
        if let Some(order_index) = patch.order_index {
            stop.order_index = order_index;
        }
        stop.coordinate = coordinate;
        Ok(stop.clone())
    }

    /// Remove a stop from whichever route owns it.
    pub async fn delete_stop(&self, id: StopId) -> Result<Stop, StoreError> {
        let mut guard = self.inner.write().await;
        for route in guard.routes.values_mut() {
            if let Some(pos) = route.stops.iter().position(|s| s.id == id) {
                return Ok(route.stops.remove(pos));
            }
        }
        Err(StoreError::StopNotFound(id))
    }

    /// Append a schedule to a route.
    ///
    /// Only a route's first schedule is forecast, so a schedule added to a
    /// route that already has one is stored but not shown.
    pub async fn add_schedule(
        &self,
        route_id: RouteId,
        new: NewSchedule,
    ) -> Result<Schedule, StoreError> {
        let mut guard = self.inner.write().await;
        guard.route_mut(route_id)?;
        let schedule = guard.build_schedule(new)?;
        guard.route_mut(route_id)?.schedules.push(schedule.clone());
        Ok(schedule)
    }

    /// Change fields of a schedule.
    pub async fn update_schedule(
        &self,
        id: ScheduleId,
        patch: SchedulePatch,
    ) -> Result<Schedule, StoreError> {
        patch.validate()?;

        let mut guard = self.inner.write().await;
        let schedule = guard.schedule_mut(id)?;
        if let Some(departure) = patch.departure {
            schedule.departure = departure;
        }
        if let Some(frequency_min) = patch.frequency_min {
            schedule.frequency_min = frequency_min;
        }
        Ok(schedule.clone())
    }

    /// Remove a schedule from whichever route owns it.
    pub async fn delete_schedule(&self, id: ScheduleId) -> Result<Schedule, StoreError> {
        let mut guard = self.inner.write().await;
        for route in guard.routes.values_mut() {
            if let Some(pos) = route.schedules.iter().position(|s| s.id == id) {
                return Ok(route.schedules.remove(pos));
            }
        }
        Err(StoreError::ScheduleNotFound(id))
    }

    /// Insert a route exactly as given, bypassing validation.
    ///
    /// Ids are taken from the route; the id counters move past them.
    #[cfg(test)]
    pub(crate) async fn insert_raw(&self, route: Route) {
        let mut guard = self.inner.write().await;
        guard.last_route = guard.last_route.max(route.id.get());
        for stop in &route.stops {
            guard.last_stop = guard.last_stop.max(stop.id.get());
        }
        for schedule in &route.schedules {
            guard.last_schedule = guard.last_schedule.max(schedule.id.get());
        }
        guard.routes.insert(route.id, route);
    }
}
