use std::net::SocketAddr;
use std::process;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use route_server::network::NetworkConfig;
use route_server::oracle::{CacheConfig, CachedOccupancy, CurveOccupancy};
use route_server::planner::SearchConfig;
use route_server::timetable::{JsonFileSource, TimetableIndex, TimetableSource};
use route_server::web::{AppState, create_router};

const DEFAULT_NETWORK_CONFIG: &str = "config/network.json";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Log and exit: start-up cannot continue.
fn fail(message: &str, err: impl std::fmt::Display) -> ! {
    error!(error = %err, "{message}");
    process::exit(1);
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("route_server=info,tower_http=info")),
        )
        .init();

    let timetable_path = std::env::var("TIMETABLE_PATH")
        .unwrap_or_else(|e| fail("TIMETABLE_PATH must name a trips JSON file", e));
    let network_path = std::env::var("NETWORK_CONFIG_PATH")
        .unwrap_or_else(|_| DEFAULT_NETWORK_CONFIG.to_string());
    let addr: SocketAddr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
        .parse()
        .unwrap_or_else(|e| fail("BIND_ADDR is not a socket address", e));

    let network = NetworkConfig::load(&network_path)
        .unwrap_or_else(|e| fail("failed to load network config", e));

    let source = JsonFileSource::new(&timetable_path, network.classifier());
    let trips = source
        .load_trips()
        .unwrap_or_else(|e| fail("failed to load timetable", e));
    let index = TimetableIndex::from_trips(trips.into_iter().map(Into::into).collect());
    info!(
        trips = index.trip_count(),
        stations = index.station_count(),
        "timetable loaded"
    );

    let occupancy = CachedOccupancy::new(CurveOccupancy::default(), &CacheConfig::default());
    let state = AppState::new(
        index,
        network.interchange_policy(),
        occupancy,
        network.fare_table(),
        SearchConfig::default(),
    );

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| fail("failed to bind", e));
    info!(%addr, "route planner listening");
    info!("  GET  /health        - Health check");
    info!("  GET  /stations      - Known stations");
    info!("  POST /route/search  - Search routes");

    if let Err(e) = axum::serve(listener, app).await {
        fail("server error", e);
    }
}
