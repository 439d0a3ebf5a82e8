//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde::de::DeserializeOwned;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::domain::{Route, RouteId, Schedule, ScheduleId, Stop, StopId};
use crate::forecast::{Forecast, ForecastError};
use crate::store::{
    NewRoute, NewSchedule, NewStop, RoutePatch, SchedulePatch, StopPatch, StoreError,
};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/routes", get(list_routes))
        .route("/routes/:id", get(get_route))
        .route("/routes/:id/next-bus", get(next_bus))
        .route("/admin/routes", post(create_route))
        .route("/admin/routes/:id", put(update_route).delete(delete_route))
        .route("/admin/routes/:id/stops", post(add_stop))
        .route("/admin/stops/:id", put(update_stop).delete(delete_stop))
        .route("/admin/routes/:id/schedules", post(add_schedule))
        .route(
            "/admin/schedules/:id",
            put(update_schedule).delete(delete_schedule),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Parse a numeric path id.
fn parse_id(raw: &str) -> Result<u64, AppError> {
    raw.parse().map_err(|_| AppError::BadRequest {
        message: "invalid id".to_string(),
    })
}

/// Parse a JSON body, so malformed input gets the same error shape as
/// everything else.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(body = %String::from_utf8_lossy(body), "rejected request body");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })
}

/// All routes with stops and schedules.
async fn list_routes(State(state): State<AppState>) -> Json<Vec<Route>> {
    Json(state.store.list_routes().await)
}

/// A single route.
async fn get_route(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Route>, AppError> {
    let id = RouteId(parse_id(&id)?);
    let route = state.store.get_route(id).await?;
    Ok(Json(route))
}

/// Next departure and arrival forecast for a route.
async fn next_bus(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Forecast>, AppError> {
    let id = RouteId(parse_id(&id)?);
    let route = state.store.get_route(id).await?;

    let now = state.clock.now();
    let forecast = state.forecaster.forecast(&route, now)?;
    Ok(Json(forecast))
}

/// Create a route, optionally with stops and schedules.
async fn create_route(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Route>), AppError> {
    let new: NewRoute = parse_body(&body)?;
    let route = state.store.create_route(new).await?;
    tracing::info!(route = %route.id, name = %route.name, "created route");
    Ok((StatusCode::CREATED, Json(route)))
}

/// Update a route's name or description.
async fn update_route(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Route>, AppError> {
    let id = RouteId(parse_id(&id)?);
    let patch: RoutePatch = parse_body(&body)?;
    let route = state.store.update_route(id, patch).await?;
    Ok(Json(route))
}

/// Delete a route with its stops and schedules.
async fn delete_route(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>, AppError> {
    let id = RouteId(parse_id(&id)?);
    state.store.delete_route(id).await?;
    tracing::info!(route = %id, "deleted route");
    Ok(Json(StatusResponse::deleted()))
}

/// Add a stop to a route.
async fn add_stop(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<Stop>), AppError> {
    let route_id = RouteId(parse_id(&id)?);
    let new: NewStop = parse_body(&body)?;
    let stop = state.store.add_stop(route_id, new).await?;
    Ok((StatusCode::CREATED, Json(stop)))
}

/// Update a stop.
async fn update_stop(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Stop>, AppError> {
    let id = StopId(parse_id(&id)?);
    let patch: StopPatch = parse_body(&body)?;
    let stop = state.store.update_stop(id, patch).await?;
    Ok(Json(stop))
}

/// Delete a stop.
async fn delete_stop(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>, AppError> {
    let id = StopId(parse_id(&id)?);
    state.store.delete_stop(id).await?;
    Ok(Json(StatusResponse::deleted()))
}

/// Add a schedule to a route.
async fn add_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<Schedule>), AppError> {
    let route_id = RouteId(parse_id(&id)?);
    let new: NewSchedule = parse_body(&body)?;
    let schedule = state.store.add_schedule(route_id, new).await?;
    Ok((StatusCode::CREATED, Json(schedule)))
}

/// Update a schedule.
async fn update_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Schedule>, AppError> {
    let id = ScheduleId(parse_id(&id)?);
    let patch: SchedulePatch = parse_body(&body)?;
    let schedule = state.store.update_schedule(id, patch).await?;
    Ok(Json(schedule))
}

/// Delete a schedule.
async fn delete_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>, AppError> {
    let id = ScheduleId(parse_id(&id)?);
    state.store.delete_schedule(id).await?;
    Ok(Json(StatusResponse::deleted()))
}

/// Application error type.
///
/// A route without schedules answers 404 like a missing route; clients
/// tell the two apart by the error message.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    /// Stored data cannot be used as-is
    Unprocessable { message: String },
    /// The server's own configuration cannot produce an answer
    Internal { message: String },
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::RouteNotFound(_) => AppError::NotFound {
                message: "route not found".to_string(),
            },
            StoreError::StopNotFound(_) => AppError::NotFound {
                message: "stop not found".to_string(),
            },
            StoreError::ScheduleNotFound(_) => AppError::NotFound {
                message: "schedule not found".to_string(),
            },
            StoreError::Invalid(e) => AppError::BadRequest {
                message: e.to_string(),
            },
        }
    }
}

impl From<ForecastError> for AppError {
    fn from(e: ForecastError) -> Self {
        match e {
            ForecastError::NoSchedule => AppError::NotFound {
                message: e.to_string(),
            },
            ForecastError::MalformedSchedule { .. } => {
                tracing::warn!(error = %e, "stored schedule is malformed");
                AppError::Unprocessable {
                    message: "invalid schedule format".to_string(),
                }
            }
            ForecastError::InvalidFrequency(_) => {
                tracing::warn!(error = %e, "stored schedule has unusable frequency");
                AppError::Unprocessable {
                    message: "invalid schedule frequency".to_string(),
                }
            }
            ForecastError::EtaOutOfRange => {
                tracing::error!(error = %e, "configured speed gives unusable arrival times");
                AppError::Internal {
                    message: "could not estimate arrival times".to_string(),
                }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Unprocessable { message } => (StatusCode::UNPROCESSABLE_ENTITY, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        tracing::debug!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
