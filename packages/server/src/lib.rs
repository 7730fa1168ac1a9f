#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the solar map.
//!
//! Serves the municipality energy density map to the website: heat
//! points and glow markers, a styled choropleth `GeoJSON`, per-feature
//! tooltips, and the number of municipalities with installations. Inputs
//! are loaded once at startup and again on `POST /api/heatmap/reload`;
//! derived layers are memoized by [`HeatmapPipeline`].

mod handlers;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use solar_map_heatmap::intensity::HeatmapLayers;
use solar_map_heatmap::pipeline::HeatmapPipeline;
use solar_map_source::loader::{LoadedMap, MapState, build_client, load_map};
use solar_map_source_models::MapConfig;
use tokio::sync::{Mutex, RwLock};

/// Shared application state.
pub struct AppState {
    /// HTTP client for the map inputs.
    pub client: reqwest::Client,
    /// Where the inputs come from and how they are styled.
    pub config: MapConfig,
    /// Most recently loaded inputs.
    pub map: RwLock<MapState>,
    /// Memoized heat map computation.
    pub pipeline: Mutex<HeatmapPipeline>,
}

impl AppState {
    /// Wraps already loaded inputs.
    #[must_use]
    pub fn new(client: reqwest::Client, config: MapConfig, map: MapState) -> Self {
        let pipeline = HeatmapPipeline::new(config.tuning.clone());
        Self {
            client,
            config,
            map: RwLock::new(map),
            pipeline: Mutex::new(pipeline),
        }
    }

    /// Returns the loaded inputs and their heat map layers, or the fatal
    /// load error.
    ///
    /// # Errors
    ///
    /// Returns the user-facing message when the boundary layer failed to
    /// load.
    pub async fn layers(&self) -> Result<(LoadedMap, Arc<HeatmapLayers>), String> {
        let map = match &*self.map.read().await {
            MapState::Ready(map) => map.clone(),
            MapState::Failed { message } => return Err(message.clone()),
        };
        let layers = self
            .pipeline
            .lock()
            .await
            .compute(&map.geometry, map.stats_records());
        Ok((map, layers))
    }

    /// Loads both inputs again and replaces the current state.
    pub async fn reload(&self) {
        let state = load_map(&self.client, &self.config).await;
        *self.map.write().await = state;
    }
}

/// Registers the API routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/heatmap", web::get().to(handlers::heatmap))
            .route("/heatmap/choropleth", web::get().to(handlers::choropleth))
            .route("/heatmap/status", web::get().to(handlers::status))
            .route("/heatmap/tooltip/{name}", web::get().to(handlers::tooltip))
            .route("/heatmap/reload", web::post().to(handlers::reload)),
    );
}

/// Starts the solar map API server.
///
/// Loads the map inputs described by `config` and serves them until the
/// server stops. A failed load does not prevent startup; the endpoints
/// report the error and `POST /api/heatmap/reload` retries. The caller
/// provides the async runtime (e.g. via `#[actix_web::main]`) and the
/// logger.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP client cannot be built,
/// or the HTTP server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: MapConfig) -> std::io::Result<()> {
    let client = build_client().map_err(std::io::Error::other)?;

    log::info!("Loading map inputs...");
    let map = load_map(&client, &config).await;
    if let MapState::Failed { message } = &map {
        log::warn!("Starting without a map: {message}");
    }

    let state = web::Data::new(AppState::new(client, config, map));

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
