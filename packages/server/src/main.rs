#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Standalone entry point for the solar map API server.
//!
//! Reads the embedded default config (or `SOLAR_MAP_CONFIG`) plus the
//! usual environment overrides, then serves on `BIND_ADDR`:`PORT`.

use std::path::PathBuf;

use solar_map_source::config::load_config;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let config_path = std::env::var("SOLAR_MAP_CONFIG").ok().map(PathBuf::from);
    let config = load_config(config_path.as_deref()).map_err(std::io::Error::other)?;

    solar_map_server::run_server(config).await
}
