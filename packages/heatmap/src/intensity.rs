//! Joins aggregates to boundary features and normalizes intensity.

use std::collections::BTreeMap;

use geojson::Feature;
use solar_map_heatmap_models::{
    FeatureStyle, GlowMarker, HeatPoint, HeatmapSummary, HeatmapTuning, LightsMode, Tooltip,
};

use crate::aggregate::{AggregateMap, add_kw};
use crate::boundary::{BoundaryLayer, feature_key, shape_name};
use crate::centroid::resolve_feature_centroid;
use crate::style;

/// Returns the normalization denominator: the largest aggregate total,
/// never less than 1.
#[must_use]
pub fn max_total_kw(aggregates: &AggregateMap) -> f64 {
    aggregates
        .values()
        .map(|a| a.total_kw)
        .fold(1.0, f64::max)
}

/// Returns `max(sqrt(total_kw / max_kw), floor)`.
///
/// Never exceeds 1 while `total_kw <= max_kw`.
#[must_use]
pub fn intensity(total_kw: f64, max_kw: f64, floor: f64) -> f64 {
    (total_kw / max_kw).sqrt().max(floor)
}

/// Immutable result of one heat map computation.
#[derive(Debug, Clone)]
pub struct HeatmapLayers {
    aggregates: AggregateMap,
    points: Vec<HeatPoint>,
    index: BTreeMap<String, usize>,
    max_total_kw: f64,
    tuning: HeatmapTuning,
}

/// Joins `aggregates` to the features of `layer`.
///
/// A feature yields a heat point only when its normalized `shapeName`
/// matches an aggregate with positive capacity and its geometry has a
/// centroid. Everything else stays unlit. When several features share a
/// key each gets its own point and key lookups return the first.
#[must_use]
pub fn build_layers(
    layer: &BoundaryLayer,
    aggregates: AggregateMap,
    tuning: &HeatmapTuning,
) -> HeatmapLayers {
    let max_kw = max_total_kw(&aggregates);
    let mut points = Vec::new();
    let mut index = BTreeMap::new();

    for feature in layer.features() {
        let key = feature_key(feature);
        let Some(aggregate) = aggregates.get(&key) else {
            continue;
        };
        if aggregate.total_kw <= 0.0 {
            continue;
        }
        let Some(centroid) = resolve_feature_centroid(feature) else {
            log::debug!(
                "Skipping marker for {:?}: geometry is not a polygon",
                shape_name(feature)
            );
            continue;
        };

        index.entry(key.clone()).or_insert(points.len());
        points.push(HeatPoint {
            key,
            lat: centroid.lat,
            lng: centroid.lng,
            intensity: intensity(aggregate.total_kw, max_kw, tuning.intensity_floor),
            provincia: aggregate.provincia.clone(),
            municipio: aggregate.municipio.clone(),
            total_kw: aggregate.total_kw,
            paneles_kw: aggregate.paneles_kw,
            inversores_kw: aggregate.inversores_kw,
        });
    }

    let unmatched = aggregates
        .keys()
        .filter(|key| !index.contains_key(*key))
        .count();
    log::debug!(
        "Built {} heat points from {} aggregates ({unmatched} without a lit boundary)",
        points.len(),
        aggregates.len()
    );

    HeatmapLayers {
        aggregates,
        points,
        index,
        max_total_kw: max_kw,
        tuning: tuning.clone(),
    }
}

impl HeatmapLayers {
    /// Returns the heat points in boundary feature order.
    #[must_use]
    pub fn points(&self) -> &[HeatPoint] {
        &self.points
    }

    /// Returns the aggregates the points were built from.
    #[must_use]
    pub const fn aggregates(&self) -> &AggregateMap {
        &self.aggregates
    }

    /// Returns the heat point for a normalized municipality key.
    #[must_use]
    pub fn point_for_key(&self, key: &str) -> Option<&HeatPoint> {
        self.index.get(key).map(|&i| &self.points[i])
    }

    /// Returns the heat point matching a boundary feature.
    #[must_use]
    pub fn point_for_feature(&self, feature: &Feature) -> Option<&HeatPoint> {
        self.point_for_key(&feature_key(feature))
    }

    /// Returns the distinct municipalities with any statistics record,
    /// matched to a boundary or not.
    #[must_use]
    pub fn municipalities_with_data(&self) -> usize {
        self.aggregates.len()
    }

    /// Returns the normalization denominator.
    #[must_use]
    pub const fn max_total_kw(&self) -> f64 {
        self.max_total_kw
    }

    /// Returns the tuning the layers were computed with.
    #[must_use]
    pub const fn tuning(&self) -> &HeatmapTuning {
        &self.tuning
    }

    /// Derives the fill and stroke of a boundary feature.
    #[must_use]
    pub fn style_for_feature(&self, feature: &Feature, lights: LightsMode) -> FeatureStyle {
        style::feature_style(self.point_for_feature(feature), lights, &self.tuning)
    }

    /// Derives the glow marker of every heat point.
    #[must_use]
    pub fn markers(&self, lights: LightsMode) -> Vec<GlowMarker> {
        self.points
            .iter()
            .enumerate()
            .map(|(i, point)| style::glow_marker(point, i, lights, &self.tuning))
            .collect()
    }

    /// Builds the tooltip of a boundary feature.
    #[must_use]
    pub fn tooltip_for_feature(&self, feature: &Feature) -> Tooltip {
        style::tooltip(shape_name(feature), self.point_for_feature(feature))
    }

    /// Returns the headline numbers of this computation.
    #[must_use]
    pub fn summary(&self) -> HeatmapSummary {
        HeatmapSummary {
            municipalities_with_data: self.municipalities_with_data(),
            lit_municipalities: self.points.len(),
            total_kw: self.aggregates.values().fold(0.0, |sum, a| add_kw(sum, a.total_kw)),
            max_total_kw: self.max_total_kw,
        }
    }
}

#[cfg(test)]
mod tests {
    use solar_map_heatmap_models::MunicipioStat;

    use super::*;
    use crate::aggregate::aggregate_stats;

    const HAVANA: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "shapeName": "Plaza" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0, 0], [0, 2], [2, 2], [2, 0], [0, 0]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "shapeName": "Centro Habana" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[3, 0], [3, 1], [4, 1], [3, 0]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "shapeName": "Regla" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[5, 0], [5, 1], [6, 1], [5, 0]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "shapeName": "Cayo Hueso" },
                "geometry": { "type": "Point", "coordinates": [7, 0] }
            }
        ]
    }"#;

    fn stat(municipio: &str, total_kw: f64) -> MunicipioStat {
        MunicipioStat {
            provincia: "La Habana".to_string(),
            municipio: municipio.to_string(),
            total_clientes_instalados: 1,
            potencia_inversores_kw: total_kw,
            potencia_paneles_kw: total_kw,
            total_kw_instalados: total_kw,
        }
    }

    fn layers_for(records: &[MunicipioStat]) -> HeatmapLayers {
        let layer = BoundaryLayer::from_geojson_str(HAVANA).unwrap();
        build_layers(&layer, aggregate_stats(records), &HeatmapTuning::default())
    }

    #[test]
    fn joins_stats_to_boundaries_end_to_end() {
        let layers = layers_for(&[stat("PLAZA", 3.0), stat("PLAZA", 7.0), stat("Vedado", 4.0)]);

        assert!((layers.aggregates()["plaza"].total_kw - 10.0).abs() < 1e-9);
        assert_eq!(layers.points().len(), 1);

        let plaza = &layers.points()[0];
        assert_eq!(plaza.key, "plaza");
        assert!((plaza.intensity - 1.0).abs() < 1e-9);
        assert!((plaza.lat - 1.0).abs() < 1e-9);
        assert!((plaza.lng - 1.0).abs() < 1e-9);

        assert!(layers.point_for_key("centro habana").is_none());
        assert!(layers.point_for_key("vedado").is_none());
        assert_eq!(layers.municipalities_with_data(), 2);
    }

    #[test]
    fn largest_municipality_has_full_intensity() {
        let layers = layers_for(&[stat("Plaza", 400.0), stat("Centro Habana", 100.0)]);
        let plaza = layers.point_for_key("plaza").unwrap();
        let centro = layers.point_for_key("centro habana").unwrap();
        assert!((plaza.intensity - 1.0).abs() < 1e-9);
        assert!((centro.intensity - 0.5).abs() < 1e-9);
    }

    #[test]
    fn intensity_stays_within_floor_and_one() {
        let layers = layers_for(&[
            stat("Plaza", 10_000.0),
            stat("Centro Habana", 0.5),
            stat("Regla", 2_500.0),
        ]);
        for point in layers.points() {
            assert!(
                (0.16..=1.0).contains(&point.intensity),
                "{} out of range: {}",
                point.key,
                point.intensity
            );
        }
        let centro = layers.point_for_key("centro habana").unwrap();
        assert!((centro.intensity - 0.16).abs() < 1e-9);
    }

    #[test]
    fn small_totals_are_normalized_against_one() {
        let layers = layers_for(&[stat("Plaza", 0.25)]);
        assert!((layers.max_total_kw() - 1.0).abs() < 1e-9);
        assert!((layers.point_for_key("plaza").unwrap().intensity - 0.5).abs() < 1e-9);
    }

    #[test]
    fn zero_capacity_stays_unlit() {
        let layers = layers_for(&[stat("Plaza", 0.0), stat("Regla", 5.0)]);
        assert!(layers.point_for_key("plaza").is_none());
        assert!(layers.point_for_key("regla").is_some());
        assert_eq!(layers.municipalities_with_data(), 2);
    }

    #[test]
    fn non_polygon_features_get_no_point() {
        let layers = layers_for(&[stat("Cayo Hueso", 5.0)]);
        assert!(layers.points().is_empty());
    }

    #[test]
    fn unlit_style_does_not_depend_on_intensity() {
        let layer = BoundaryLayer::from_geojson_str(HAVANA).unwrap();
        let centro = &layer.features()[1];
        let with_data = build_layers(
            &layer,
            aggregate_stats(&[stat("Plaza", 10.0)]),
            &HeatmapTuning::default(),
        );
        let without_data =
            build_layers(&layer, AggregateMap::new(), &HeatmapTuning::default());
        assert_eq!(
            with_data.style_for_feature(centro, LightsMode::On),
            without_data.style_for_feature(centro, LightsMode::On)
        );
    }

    #[test]
    fn markers_follow_points() {
        let layers = layers_for(&[stat("Plaza", 10.0), stat("Regla", 2.5)]);
        let markers = layers.markers(LightsMode::On);
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].key, "plaza");
        assert_eq!(markers[1].key, "regla");
        assert!(markers[0].size_px > markers[1].size_px);
    }

    #[test]
    fn tooltips_distinguish_matched_features() {
        let layer = BoundaryLayer::from_geojson_str(HAVANA).unwrap();
        let layers = build_layers(
            &layer,
            aggregate_stats(&[stat("Plaza", 10.0)]),
            &HeatmapTuning::default(),
        );
        assert!(matches!(
            layers.tooltip_for_feature(&layer.features()[0]),
            Tooltip::Matched { .. }
        ));
        assert_eq!(
            layers.tooltip_for_feature(&layer.features()[2]),
            Tooltip::Unmatched {
                name: "Regla".to_string()
            }
        );
    }

    #[test]
    fn summary_counts_lit_and_recorded_municipalities() {
        let layers = layers_for(&[stat("Plaza", 10.0), stat("Vedado", 5.0)]);
        let summary = layers.summary();
        assert_eq!(summary.municipalities_with_data, 2);
        assert_eq!(summary.lit_municipalities, 1);
        assert!((summary.total_kw - 15.0).abs() < 1e-9);
        assert!((summary.max_total_kw - 10.0).abs() < 1e-9);
    }

    #[test]
    fn huge_totals_keep_full_intensity_and_a_finite_summary() {
        let layers = layers_for(&[stat("Plaza", 1e308), stat("Plaza", 1e308), stat("Regla", 1e308)]);
        assert!(layers.max_total_kw().is_finite());
        assert!((layers.point_for_key("plaza").unwrap().intensity - 1.0).abs() < 1e-9);
        assert!(layers.summary().total_kw.is_finite());
    }
}
