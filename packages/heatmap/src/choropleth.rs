//! Self-describing choropleth export.
//!
//! For renderers that take plain `GeoJSON` instead of a style callback:
//! each boundary feature is emitted with its precomputed style and
//! tooltip as properties.

use geojson::FeatureCollection;
use solar_map_heatmap_models::LightsMode;

use crate::boundary::{BoundaryLayer, feature_key};
use crate::intensity::HeatmapLayers;

/// Builds a `FeatureCollection` of every boundary feature with `key`,
/// `style`, `tooltip`, `tooltipText`, and `intensity` properties added.
///
/// `intensity` is `null` for unlit features.
#[must_use]
pub fn choropleth_collection(
    layer: &BoundaryLayer,
    layers: &HeatmapLayers,
    lights: LightsMode,
) -> FeatureCollection {
    let features = layer
        .features()
        .iter()
        .map(|feature| {
            let style = layers.style_for_feature(feature, lights);
            let tooltip = layers.tooltip_for_feature(feature);
            let intensity = layers.point_for_feature(feature).map(|p| p.intensity);
            let key = feature_key(feature);

            let mut feature = feature.clone();
            feature.set_property("key", key);
            feature.set_property(
                "style",
                serde_json::to_value(&style).unwrap_or(serde_json::Value::Null),
            );
            feature.set_property("tooltipText", tooltip.to_string());
            feature.set_property(
                "tooltip",
                serde_json::to_value(&tooltip).unwrap_or(serde_json::Value::Null),
            );
            feature.set_property("intensity", intensity);
            feature
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use solar_map_heatmap_models::{HeatmapTuning, MunicipioStat};

    use super::*;
    use crate::aggregate::aggregate_stats;
    use crate::intensity::build_layers;

    const LAYER: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "shapeName": "Plaza", "iso": "CU-03" },
                "geometry": { "type": "Polygon", "coordinates": [[[0, 0], [0, 2], [2, 2], [0, 0]]] }
            },
            {
                "type": "Feature",
                "properties": { "shapeName": "Regla" },
                "geometry": { "type": "Polygon", "coordinates": [[[5, 0], [5, 1], [6, 1], [5, 0]]] }
            }
        ]
    }"#;

    fn collection(lights: LightsMode) -> FeatureCollection {
        let layer = BoundaryLayer::from_geojson_str(LAYER).unwrap();
        let records = [MunicipioStat {
            provincia: "La Habana".to_string(),
            municipio: "Plaza".to_string(),
            total_clientes_instalados: 2,
            potencia_inversores_kw: 4.0,
            potencia_paneles_kw: 5.0,
            total_kw_instalados: 9.0,
        }];
        let layers = build_layers(&layer, aggregate_stats(&records), &HeatmapTuning::default());
        choropleth_collection(&layer, &layers, lights)
    }

    #[test]
    fn adds_style_and_tooltip_properties() {
        let fc = collection(LightsMode::On);
        assert_eq!(fc.features.len(), 2);

        let plaza = &fc.features[0];
        assert_eq!(plaza.property("key").unwrap(), "plaza");
        assert_eq!(plaza.property("iso").unwrap(), "CU-03");
        assert_eq!(plaza.property("tooltip").unwrap()["kind"], "matched");
        assert_eq!(plaza.property("intensity").unwrap(), 1.0);
        let fill = plaza.property("style").unwrap()["fillOpacity"].as_f64().unwrap();
        assert!((fill - 0.6).abs() < 1e-9);

        let regla = &fc.features[1];
        assert_eq!(regla.property("tooltip").unwrap()["kind"], "unmatched");
        assert!(regla.property("intensity").unwrap().is_null());
        assert!(regla.geometry.is_some());
    }

    #[test]
    fn blackout_applies_to_every_feature() {
        let fc = collection(LightsMode::Off);
        let fills: Vec<f64> = fc
            .features
            .iter()
            .map(|f| f.property("style").unwrap()["fillOpacity"].as_f64().unwrap())
            .collect();
        assert_eq!(fills, vec![0.04, 0.04]);
    }
}
