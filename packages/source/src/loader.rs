//! Concurrent loading of both map inputs.
//!
//! The boundary layer and the statistics are requested at the same time
//! and the map waits for both. A missing boundary layer means there is
//! no map to draw. Missing statistics still leave a drawable map with
//! every municipality unlit, plus an error for the page to show. Nothing
//! is retried here; retrying is a user action.

use std::sync::Arc;

use solar_map_heatmap::boundary::BoundaryLayer;
use solar_map_heatmap_models::MunicipioStat;
use solar_map_source_models::MapConfig;

use crate::SourceError;
use crate::fetchers::{load_geometry, load_stats};
use crate::stats::StatsSnapshot;

/// Outcome of loading the map inputs.
#[derive(Debug, Clone)]
pub enum MapState {
    /// The boundary layer loaded; statistics may be missing.
    Ready(LoadedMap),
    /// The boundary layer failed to load; no map can be drawn.
    Failed {
        /// User-facing error description.
        message: String,
    },
}

/// Inputs of a drawable map.
#[derive(Debug, Clone)]
pub struct LoadedMap {
    /// Municipal boundaries.
    pub geometry: Arc<BoundaryLayer>,
    /// Installation statistics, `None` when they failed to load.
    pub stats: Option<StatsSnapshot>,
    /// Why the statistics are missing, if they are.
    pub stats_error: Option<String>,
}

impl LoadedMap {
    /// Returns the statistics records, if they loaded.
    #[must_use]
    pub fn stats_records(&self) -> Option<&Arc<Vec<MunicipioStat>>> {
        self.stats.as_ref().map(|s| &s.records)
    }
}

impl MapState {
    /// Returns the loaded map, if the boundary layer is available.
    #[must_use]
    pub const fn loaded(&self) -> Option<&LoadedMap> {
        match self {
            Self::Ready(map) => Some(map),
            Self::Failed { .. } => None,
        }
    }
}

/// Builds the HTTP client used for both inputs.
///
/// # Errors
///
/// Returns [`SourceError::Http`] if the client cannot be initialised.
pub fn build_client() -> Result<reqwest::Client, SourceError> {
    Ok(reqwest::Client::builder()
        .user_agent(concat!("solar_map/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

/// Loads both inputs concurrently and resolves the resulting state.
///
/// Dropping the returned future aborts both loads.
pub async fn load_map(client: &reqwest::Client, config: &MapConfig) -> MapState {
    log::info!(
        "Loading map inputs (boundaries: {}, statistics: {})",
        config.geometry,
        config.stats
    );
    let (geometry, stats) = tokio::join!(
        load_geometry(client, &config.geometry),
        load_stats(client, &config.stats),
    );
    resolve_map_state(geometry, stats)
}

/// Combines the two load results per the failure rules above.
#[must_use]
pub fn resolve_map_state(
    geometry: Result<BoundaryLayer, SourceError>,
    stats: Result<StatsSnapshot, SourceError>,
) -> MapState {
    let geometry = match geometry {
        Ok(layer) => layer,
        Err(e) => {
            log::error!("Failed to load municipal boundaries: {e}");
            return MapState::Failed {
                message: format!("No se pudo cargar el mapa: {e}"),
            };
        }
    };

    let (stats, stats_error) = match stats {
        Ok(snapshot) => (Some(snapshot), None),
        Err(e) => {
            log::error!("Failed to load installation statistics: {e}");
            (
                None,
                Some(format!("No se pudieron cargar las estadísticas: {e}")),
            )
        }
    };

    MapState::Ready(LoadedMap {
        geometry: Arc::new(geometry),
        stats,
        stats_error,
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use solar_map_source_models::InputLocation;

    use super::*;
    use crate::StatsError;
    use crate::stats::parse_stats_response;

    const GEOJSON: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","properties":{"shapeName":"Plaza"},
         "geometry":{"type":"Polygon","coordinates":[[[0,0],[0,2],[2,2],[0,0]]]}}
    ]}"#;

    const STATS: &str = r#"{"success":true,"data":[
        {"provincia":"La Habana","municipio":"PLAZA","total_kw_instalados":3},
        {"provincia":"La Habana","municipio":"Plaza","total_kw_instalados":"7"}
    ]}"#;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn geometry_failure_is_fatal() {
        let state = resolve_map_state(
            Err(SourceError::Stats(StatsError::MalformedData)),
            parse_stats_response(STATS).map_err(SourceError::from),
        );
        assert!(matches!(state, MapState::Failed { .. }));
        assert!(state.loaded().is_none());
    }

    #[test]
    fn stats_failure_keeps_geometry() {
        let state = resolve_map_state(
            BoundaryLayer::from_geojson_str(GEOJSON).map_err(SourceError::from),
            Err(SourceError::Stats(StatsError::Rejected {
                message: Some("mantenimiento".to_string()),
            })),
        );

        let map = state.loaded().unwrap();
        assert_eq!(map.geometry.len(), 1);
        assert!(map.stats.is_none());
        assert!(map.stats_error.as_deref().unwrap().contains("mantenimiento"));
    }

    #[tokio::test]
    async fn loads_both_inputs_from_files() {
        let geometry = write_temp("solar_map_loader_geometry.geojson", GEOJSON);
        let stats = write_temp("solar_map_loader_stats.json", STATS);
        let config = MapConfig {
            geometry: InputLocation::File {
                path: geometry.clone(),
            },
            stats: InputLocation::File {
                path: stats.clone(),
            },
            tuning: solar_map_heatmap_models::HeatmapTuning::default(),
        };

        let client = build_client().unwrap();
        let state = load_map(&client, &config).await;

        let map = state.loaded().unwrap();
        assert!(map.stats_error.is_none());
        assert_eq!(map.stats_records().unwrap().len(), 2);

        let _ = std::fs::remove_file(&geometry);
        let _ = std::fs::remove_file(&stats);
    }

    #[tokio::test]
    async fn missing_stats_file_still_yields_a_map() {
        let geometry = write_temp("solar_map_loader_geometry_only.geojson", GEOJSON);
        let config = MapConfig {
            geometry: InputLocation::File {
                path: geometry.clone(),
            },
            stats: InputLocation::File {
                path: PathBuf::from("/nonexistent/solar_map_stats.json"),
            },
            tuning: solar_map_heatmap_models::HeatmapTuning::default(),
        };

        let client = build_client().unwrap();
        let map = load_map(&client, &config).await;
        let map = map.loaded().unwrap();
        assert!(map.stats_records().is_none());
        assert!(map.stats_error.is_some());

        let _ = std::fs::remove_file(&geometry);
    }

    #[tokio::test]
    async fn stats_server_error_still_yields_an_unlit_map() {
        let geometry = write_temp("solar_map_loader_geometry_500.geojson", GEOJSON);
        let url = crate::fetchers::http::test_server::respond_once(
            "500 Internal Server Error",
            "",
        )
        .await;
        let config = MapConfig {
            geometry: InputLocation::File {
                path: geometry.clone(),
            },
            stats: InputLocation::Url { url },
            tuning: solar_map_heatmap_models::HeatmapTuning::default(),
        };

        let client = crate::fetchers::http::test_server::client();
        let state = load_map(&client, &config).await;
        let _ = std::fs::remove_file(&geometry);

        let map = state.loaded().unwrap();
        assert_eq!(map.geometry.len(), 1);
        assert!(map.stats_records().is_none());
        assert!(map.stats_error.as_deref().unwrap().contains("500"));
    }
}
