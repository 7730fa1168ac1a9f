#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the solar map toolchain.
//!
//! `compute` loads the inputs once and prints a heat map output as JSON,
//! `normalize` shows the join key of municipality names, and `serve`
//! starts the API server.

mod compute;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use compute::OutputFormat;
use solar_map_heatmap::normalize::normalize_name;
use solar_map_heatmap_models::LightsMode;
use solar_map_source::config::load_config;
use solar_map_source_models::InputLocation;

#[derive(Parser)]
#[command(name = "solar_map", about = "Municipality solar energy density map")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the inputs and print a heat map output as JSON
    Compute {
        /// TOML config file (defaults to the embedded config)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Boundary `GeoJSON` path or URL (overrides the config)
        #[arg(long)]
        geometry: Option<String>,
        /// Statistics path or URL (overrides the config)
        #[arg(long)]
        stats: Option<String>,
        /// Lights mode for styles and markers ("on" or "off")
        #[arg(long, default_value = "on")]
        lights: LightsMode,
        /// Which output to print
        #[arg(long, value_enum, default_value = "summary")]
        output: OutputFormat,
    },
    /// Print the normalized join key of each name
    Normalize {
        /// Municipality names
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Start the API server on `BIND_ADDR`:`PORT`
    Serve {
        /// TOML config file (defaults to the embedded config)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Compute {
            config,
            geometry,
            stats,
            lights,
            output,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(geometry) = geometry {
                config.geometry = InputLocation::parse(&geometry);
            }
            if let Some(stats) = stats {
                config.stats = InputLocation::parse(&stats);
            }

            let json = compute::run(&config, lights, output).await?;
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        Commands::Normalize { names } => {
            for name in names {
                println!("{}", normalize_name(&name));
            }
        }
        Commands::Serve { config } => {
            let config = load_config(config.as_deref())?;
            // The server uses actix-web's runtime, so we need to run it
            // in a blocking task to avoid nesting tokio runtimes.
            tokio::task::spawn_blocking(|| {
                actix_web::rt::System::new().block_on(solar_map_server::run_server(config))
            })
            .await??;
        }
    }

    Ok(())
}
