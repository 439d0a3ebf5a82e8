use std::process::ExitCode;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use bus_server::clock::SystemClock;
use bus_server::config::ServerConfig;
use bus_server::forecast::Forecaster;
use bus_server::store::{RouteStore, seed_sample_data};
use bus_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bus_server=info,tower_http=info".into()),
        )
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let store = RouteStore::new();
    if config.seed {
        if let Err(e) = seed_sample_data(&store).await {
            tracing::error!("failed to seed sample data: {e}");
            return ExitCode::FAILURE;
        }
    }

    let forecaster = Forecaster::new(config.forecast.clone());
    let state = AppState::new(store, forecaster, SystemClock);
    let app = create_router(state);

    let listener = match tokio::net::TcpListener::bind(config.addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("failed to bind {}: {e}", config.addr);
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        "Bus arrival service listening on http://{} (forecasting {} buses at {} km/h)",
        config.addr,
        config.forecast.bus_count,
        config.forecast.average_speed_kmh
    );
    tracing::info!("API Endpoints:");
    tracing::info!("  GET  /health                 - Health check");
    tracing::info!("  GET  /routes                 - List routes");
    tracing::info!("  GET  /routes/:id             - Route detail");
    tracing::info!("  GET  /routes/:id/next-bus    - Next bus and stop ETAs");
    tracing::info!("  *    /admin/...              - Edit routes, stops and schedules");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
