#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Configuration types for the solar map data inputs.
//!
//! The map is driven by two independently maintained inputs: a static
//! municipal boundary layer and the installed capacity statistics feed.
//! Each can be read from a URL or a local file.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use solar_map_heatmap_models::HeatmapTuning;

/// Where an input document is loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputLocation {
    /// Fetched over HTTP(S) with a `GET` request.
    Url {
        /// Full URL of the document.
        url: String,
    },
    /// Read from the local filesystem.
    File {
        /// Path of the document.
        path: PathBuf,
    },
}

impl InputLocation {
    /// Interprets a command-line or environment value: anything starting
    /// with `http://` or `https://` is a URL, everything else a path.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.starts_with("http://") || value.starts_with("https://") {
            Self::Url {
                url: value.to_string(),
            }
        } else {
            Self::File {
                path: PathBuf::from(value),
            }
        }
    }
}

impl std::fmt::Display for InputLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Url { url } => write!(f, "{url}"),
            Self::File { path } => write!(f, "{}", path.display()),
        }
    }
}

/// Top-level map configuration, deserialized from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    /// Municipal boundary `GeoJSON` `FeatureCollection`.
    pub geometry: InputLocation,
    /// Installed capacity statistics endpoint.
    pub stats: InputLocation,
    /// Intensity and styling constants.
    #[serde(default)]
    pub tuning: HeatmapTuning,
}
