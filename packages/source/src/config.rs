//! Map configuration loading.
//!
//! The embedded `config/default.toml` is the base. A config file given on
//! the command line replaces it, and the `SOLAR_MAP_GEOMETRY` /
//! `SOLAR_MAP_STATS` environment variables override individual inputs.

use std::path::Path;

use solar_map_source_models::{InputLocation, MapConfig};

use crate::ConfigError;

/// Environment variable overriding the boundary layer location.
pub const GEOMETRY_ENV: &str = "SOLAR_MAP_GEOMETRY";

/// Environment variable overriding the statistics location.
pub const STATS_ENV: &str = "SOLAR_MAP_STATS";

const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Returns the embedded default configuration.
///
/// # Panics
///
/// Panics if the embedded TOML fails to parse. It is a compile-time
/// constant, so a failure is a development error caught by the tests.
#[must_use]
pub fn default_config() -> MapConfig {
    parse_config(DEFAULT_CONFIG)
        .unwrap_or_else(|e| panic!("Failed to parse embedded default config: {e}"))
}

/// Parses a TOML configuration document.
///
/// # Errors
///
/// Returns [`ConfigError::Toml`] if the document is not a valid
/// [`MapConfig`].
pub fn parse_config(text: &str) -> Result<MapConfig, ConfigError> {
    Ok(toml::de::from_str(text)?)
}

/// Loads the configuration from `path` (or the embedded default) and
/// applies environment overrides.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file cannot be read or parsed.
pub fn load_config(path: Option<&Path>) -> Result<MapConfig, ConfigError> {
    let config = match path {
        Some(path) => {
            log::info!("Loading config from {}", path.display());
            let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            parse_config(&text)?
        }
        None => default_config(),
    };

    Ok(apply_overrides(config, |name| std::env::var(name).ok()))
}

/// Replaces input locations with the values `lookup` returns for
/// [`GEOMETRY_ENV`] and [`STATS_ENV`]. Blank values are ignored.
#[must_use]
pub fn apply_overrides(mut config: MapConfig, lookup: impl Fn(&str) -> Option<String>) -> MapConfig {
    let lookup_location = |name: &str| {
        lookup(name)
            .filter(|value| !value.trim().is_empty())
            .map(|value| InputLocation::parse(&value))
    };

    if let Some(geometry) = lookup_location(GEOMETRY_ENV) {
        log::debug!("{GEOMETRY_ENV} overrides boundary layer: {geometry}");
        config.geometry = geometry;
    }
    if let Some(stats) = lookup_location(STATS_ENV) {
        log::debug!("{STATS_ENV} overrides statistics source: {stats}");
        config.stats = stats;
    }

    config
}
