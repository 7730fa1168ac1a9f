#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the solar map server.
//!
//! These types are serialized to JSON for the REST API consumed by the
//! website's map component.

use serde::{Deserialize, Serialize};
use solar_map_heatmap_models::{GlowMarker, HeatPoint, HeatmapSummary, LightsMode};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// Error body returned with non-success statuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// User-facing error description.
    pub error: String,
}

/// Query parameters shared by the heat map endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapQueryParams {
    /// `"on"` or `"off"`; defaults to on.
    pub lights: Option<String>,
}

/// Everything the map component needs to draw the heat layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHeatmap {
    /// Lights mode the markers were derived for.
    pub lights: LightsMode,
    /// Lit municipalities.
    pub points: Vec<HeatPoint>,
    /// Glow markers, one per point, in the same order.
    pub markers: Vec<GlowMarker>,
    /// Headline numbers.
    pub summary: HeatmapSummary,
    /// `[[south, west], [north, east]]` of the boundary layer.
    pub bounds: Option<[[f64; 2]; 2]>,
    /// Set when the statistics failed to load and the map is unlit.
    pub stats_error: Option<String>,
}

/// Status of the loaded map inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMapStatus {
    /// Whether a map can be drawn.
    pub ready: bool,
    /// Number of boundary features.
    pub boundary_features: usize,
    /// Number of statistics records.
    pub stats_records: usize,
    /// Municipalities with statistics.
    pub municipalities_with_data: usize,
    /// Fatal error (no map) or statistics error (unlit map).
    pub error: Option<String>,
}
