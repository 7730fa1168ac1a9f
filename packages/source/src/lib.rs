#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loads the solar map inputs.
//!
//! Reads the municipal boundary layer and the installed capacity
//! statistics from URLs or files, validates the statistics payload at
//! the ingestion boundary, and combines both into a [`loader::MapState`]
//! that tells the caller whether a map can be drawn and whether it has
//! data on it.

pub mod config;
pub mod fetchers;
pub mod loader;
pub mod stats;

use std::path::PathBuf;

use solar_map_heatmap::HeatmapError;
use thiserror::Error;

/// Errors that can occur while loading an input document.
#[derive(Debug, Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Request to {url} failed with status {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// Response status.
        status: reqwest::StatusCode,
    },

    /// Reading a local file failed.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The boundary layer could not be parsed.
    #[error("Boundary layer error: {0}")]
    Geometry(#[from] HeatmapError),

    /// The statistics payload was rejected at the ingestion boundary.
    #[error("Statistics error: {0}")]
    Stats(#[from] StatsError),
}

/// Reasons a statistics payload is treated as a fetch failure.
#[derive(Debug, Error)]
pub enum StatsError {
    /// The body is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The API answered `success: false`.
    #[error("Statistics API reported failure: {}", message.as_deref().unwrap_or("no message"))]
    Rejected {
        /// Message returned by the API, if any.
        message: Option<String>,
    },

    /// `data` is missing or not an array.
    #[error("Statistics payload has no data array")]
    MalformedData,
}

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the config file failed.
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        /// Config file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`solar_map_source_models::MapConfig`].
    #[error("Invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}
