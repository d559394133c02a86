use std::process::ExitCode;

use chrono::NaiveDateTime;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use route_planner::catalog::JsonCatalogFile;
use route_planner::congestion::{
    CachedCongestion, CongestionCacheConfig, CongestionClient, CongestionClientConfig,
};
use route_planner::engine::{RouteEngine, RouteOptions};
use route_planner::planner::{CongestionWeighting, SearchConfig};

const USAGE: &str = "usage: route-planner <from> <to> [departure, e.g. 2024-03-15T08:30]";

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (from, to) = match (args.first(), args.get(1)) {
        (Some(from), Some(to)) => (from.as_str(), to.as_str()),
        _ => {
            eprintln!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };
    let departure = match args.get(2).map(|s| parse_departure(s)) {
        None => None,
        Some(Some(departure)) => Some(departure),
        Some(None) => {
            eprintln!("Invalid departure time: {}", args[2]);
            eprintln!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    // Network catalog
    let catalog_path = std::env::var("ROUTE_CATALOG").unwrap_or_else(|_| "catalog.json".to_string());
    let mut search_config = SearchConfig::default();
    if let Some(max_transfers) = env_usize("ROUTE_MAX_TRANSFERS") {
        search_config = search_config.with_max_transfers(max_transfers);
    }

    let mut engine = RouteEngine::new(JsonCatalogFile::new(&catalog_path));

    // Congestion API is optional; without it every station counts as normal
    if let Ok(base_url) = std::env::var("CONGESTION_API_URL") {
        let mut config = CongestionClientConfig::new(base_url);
        if let Ok(key) = std::env::var("CONGESTION_API_KEY") {
            config = config.with_api_key(key);
        }
        match CongestionClient::new(config) {
            Ok(client) => {
                let cached = CachedCongestion::new(client, &CongestionCacheConfig::default());
                engine = engine.with_congestion(cached);
                search_config = search_config.with_weighting(CongestionWeighting::Live);
            }
            Err(e) => warn!(error = %e, "Failed to create congestion client, continuing without"),
        }
    }
    let engine = engine.with_search_config(search_config);

    let (start, end) = match (engine.resolve_station(from), engine.resolve_station(to)) {
        (Ok(Some(start)), Ok(Some(end))) => (start, end),
        (Err(e), _) | (_, Err(e)) => {
            error!(path = %catalog_path, error = %e, "Failed to load network");
            return ExitCode::FAILURE;
        }
        (start, _) => {
            let unknown = if matches!(start, Ok(None)) { from } else { to };
            eprintln!("Unknown station: {unknown}");
            return ExitCode::FAILURE;
        }
    };

    let routes = match engine.find_routes(&start, &end, departure, &RouteOptions::default()) {
        Ok(routes) => routes,
        Err(e) => {
            error!(error = %e, "Route search failed");
            return ExitCode::FAILURE;
        }
    };
    info!(from = %start, to = %end, routes = routes.len(), "Search complete");

    match serde_json::to_string_pretty(&routes) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Failed to serialize routes");
            ExitCode::FAILURE
        }
    }
}

fn parse_departure(s: &str) -> Option<NaiveDateTime> {
    ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
}

fn env_usize(name: &str) -> Option<usize> {
    let value = std::env::var(name).ok()?;
    match value.trim().parse() {
        Ok(n) => Some(n),
        Err(_) => {
            warn!(name, value = %value, "Ignoring non-numeric setting");
            None
        }
    }
}
