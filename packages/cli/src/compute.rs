//! One-shot heat map computation for the `compute` command.

use clap::ValueEnum;
use solar_map_heatmap::choropleth::choropleth_collection;
use solar_map_heatmap::pipeline::HeatmapPipeline;
use solar_map_heatmap_models::LightsMode;
use solar_map_source::loader::{LoadedMap, MapState, build_client, load_map};
use solar_map_source_models::MapConfig;

/// What `compute` prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Heat points.
    Points,
    /// Glow markers.
    Markers,
    /// Styled boundary `GeoJSON`.
    Choropleth,
    /// Headline numbers, bounds, and the statistics error.
    Summary,
}

/// Loads the inputs in `config` and renders `format` as JSON.
///
/// # Errors
///
/// Returns an error if the boundary layer cannot be loaded. A statistics
/// failure is logged and the unlit map is rendered.
pub async fn run(
    config: &MapConfig,
    lights: LightsMode,
    format: OutputFormat,
) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let client = build_client()?;

    let map = match load_map(&client, config).await {
        MapState::Ready(map) => map,
        MapState::Failed { message } => return Err(message.into()),
    };
    if let Some(error) = &map.stats_error {
        log::warn!("Rendering without statistics: {error}");
    }

    let mut pipeline = HeatmapPipeline::new(config.tuning.clone());
    Ok(render(&map, &mut pipeline, lights, format)?)
}

/// Renders one output format for already loaded inputs.
///
/// # Errors
///
/// Returns an error if the output cannot be serialized.
pub fn render(
    map: &LoadedMap,
    pipeline: &mut HeatmapPipeline,
    lights: LightsMode,
    format: OutputFormat,
) -> Result<serde_json::Value, serde_json::Error> {
    let layers = pipeline.compute(&map.geometry, map.stats_records());

    match format {
        OutputFormat::Points => serde_json::to_value(layers.points()),
        OutputFormat::Markers => serde_json::to_value(layers.markers(lights)),
        OutputFormat::Choropleth => {
            serde_json::to_value(choropleth_collection(&map.geometry, &layers, lights))
        }
        OutputFormat::Summary => Ok(serde_json::json!({
            "summary": layers.summary(),
            "bounds": map.geometry.bounds().map(|b| b.corners()),
            "boundaryFeatures": map.geometry.len(),
            "statsError": map.stats_error,
        })),
    }
}
