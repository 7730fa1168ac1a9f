#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Municipality energy density map.
//!
//! Joins a municipal boundary layer (`GeoJSON` polygons keyed by a
//! `shapeName` property) against installed solar capacity statistics,
//! keyed by municipality name. The two datasets are maintained
//! independently, so names are matched through [`normalize::normalize_name`].
//!
//! The pipeline is:
//!
//! 1. [`aggregate::aggregate_stats`] folds raw records into one total per
//!    normalized municipality name.
//! 2. [`intensity::build_layers`] joins the totals to the boundary
//!    features, places a marker at each feature's
//!    [`centroid::resolve_centroid`], and normalizes capacity into an
//!    intensity.
//! 3. [`style`] derives fill, glow, and tooltip parameters from the
//!    resulting [`solar_map_heatmap_models::HeatPoint`]s.
//!
//! [`pipeline::HeatmapPipeline`] memoizes the whole computation on the
//! identity of its two inputs.

pub mod aggregate;
pub mod boundary;
pub mod centroid;
pub mod choropleth;
pub mod intensity;
pub mod normalize;
pub mod pipeline;
pub mod style;

use thiserror::Error;

/// Errors that can occur while loading the boundary layer.
#[derive(Debug, Error)]
pub enum HeatmapError {
    /// The document is not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// The document is valid `GeoJSON` but not a `FeatureCollection`.
    #[error("Expected a GeoJSON FeatureCollection, found a {found}")]
    NotFeatureCollection {
        /// Kind of `GeoJSON` object found instead.
        found: &'static str,
    },
}
