//! Fetcher dispatch for input documents.
//!
//! Each input is either fetched over HTTP or read from disk, then parsed
//! into its typed form.

pub mod file;
pub mod http;

use solar_map_heatmap::boundary::BoundaryLayer;
use solar_map_source_models::InputLocation;

use crate::SourceError;
use crate::stats::{StatsSnapshot, parse_stats_response};

/// Fetches the raw text of an input document.
///
/// # Errors
///
/// Returns [`SourceError`] if the request or file read fails.
pub async fn fetch_text(
    client: &reqwest::Client,
    location: &InputLocation,
) -> Result<String, SourceError> {
    match location {
        InputLocation::Url { url } => http::fetch(client, url).await,
        InputLocation::File { path } => file::read(path).await,
    }
}

/// Loads and parses the municipal boundary layer.
///
/// # Errors
///
/// Returns [`SourceError`] if the document cannot be fetched or is not a
/// `GeoJSON` `FeatureCollection`.
pub async fn load_geometry(
    client: &reqwest::Client,
    location: &InputLocation,
) -> Result<BoundaryLayer, SourceError> {
    let text = fetch_text(client, location).await?;
    let layer = BoundaryLayer::from_geojson_str(&text)?;
    log::info!("Loaded {} boundary features from {location}", layer.len());
    Ok(layer)
}

/// Loads and validates the installation statistics.
///
/// # Errors
///
/// Returns [`SourceError`] if the document cannot be fetched or fails
/// validation.
pub async fn load_stats(
    client: &reqwest::Client,
    location: &InputLocation,
) -> Result<StatsSnapshot, SourceError> {
    let text = fetch_text(client, location).await?;
    let snapshot = parse_stats_response(&text)?;
    log::info!(
        "Loaded {} statistics records from {location}",
        snapshot.records.len()
    );
    Ok(snapshot)
}
