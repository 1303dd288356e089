//! Query server for barangay resolution.
//!
//! Exposes the locator over HTTP: point resolution, the list of loaded
//! barangays, dataset metadata and runtime statistics.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use narra::models::{BarangaySummary, Resolution};
use narra::pip::{LocatorState, PerformanceStats};
use narra::{Locator, LocatorConfig, LocatorError};

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Barangay resolution server")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:3000")]
    listen: String,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Boundary dataset, overrides the paths in the config file
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Load the dataset before accepting requests instead of on first query
    #[arg(long)]
    eager: bool,
}

/// Application state shared across handlers
struct AppState {
    locator: Locator,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let config = resolve_config(args.config.as_deref(), args.dataset)?;

    info!("Narra Barangay Server");
    info!("Dataset candidates: {:?}", config.dataset_paths);

    let locator = Locator::new(config);
    if args.eager {
        locator
            .index()
            .await
            .context("Failed to load barangay boundaries")?;
    }

    let state = Arc::new(AppState { locator });

    // Build router
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/v1/resolve", get(resolve_handler))
        .route("/v1/barangays", get(barangays_handler))
        .route("/v1/metadata", get(metadata_handler))
        .route("/v1/stats", get(stats_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("Starting server on {}", args.listen);

    let listener = tokio::net::TcpListener::bind(&args.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn resolve_config(
    path: Option<&std::path::Path>,
    dataset: Option<PathBuf>,
) -> Result<LocatorConfig> {
    match (path, dataset) {
        (Some(path), dataset) => {
            let mut config = LocatorConfig::load_from_file(path)?;
            if let Some(dataset) = dataset {
                config.dataset_paths = vec![dataset];
            }
            Ok(config)
        }
        (None, Some(dataset)) => Ok(LocatorConfig::with_dataset(dataset)),
        (None, None) => anyhow::bail!("Either --config or --dataset is required"),
    }
}

fn error_response(e: LocatorError) -> (StatusCode, String) {
    let status = if e.is_initialization() {
        tracing::error!("Barangay data unavailable: {}", e);
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::BAD_REQUEST
    };
    (status, e.to_string())
}

/// Health check endpoint
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let locator_state = state.locator.state();
    Json(HealthResponse {
        status: if locator_state == LocatorState::Failed {
            "degraded"
        } else {
            "ok"
        },
        locator: locator_state,
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    locator: LocatorState,
}

#[derive(Deserialize)]
struct ResolveQueryParams {
    lat: f64,
    lng: f64,
}

/// Resolve a coordinate to its barangay
async fn resolve_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ResolveQueryParams>,
) -> Result<Json<Resolution>, (StatusCode, String)> {
    state
        .locator
        .resolve(params.lat, params.lng)
        .await
        .map(Json)
        .map_err(error_response)
}

/// Every loaded barangay
async fn barangays_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BarangaySummary>>, (StatusCode, String)> {
    state.locator.list_all().await.map(Json).map_err(error_response)
}

/// Dataset metadata block
async fn metadata_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Map<String, serde_json::Value>>, (StatusCode, String)> {
    state.locator.metadata().await.map(Json).map_err(error_response)
}

/// Query statistics since startup
async fn stats_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PerformanceStats>, (StatusCode, String)> {
    state
        .locator
        .performance_stats()
        .await
        .map(Json)
        .map_err(error_response)
}
