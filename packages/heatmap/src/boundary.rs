//! The municipal boundary layer.

use geo::BoundingRect;
use geojson::{Feature, FeatureCollection, GeoJson};
use solar_map_heatmap_models::MapBounds;

use crate::HeatmapError;
use crate::normalize::normalize_name;

/// Feature property carrying the boundary dataset's municipality name.
pub const SHAPE_NAME_PROPERTY: &str = "shapeName";

/// Municipality polygons, loaded once and never mutated.
#[derive(Debug, Clone)]
pub struct BoundaryLayer {
    features: Vec<Feature>,
    bounds: Option<MapBounds>,
}

impl BoundaryLayer {
    /// Parses a `GeoJSON` `FeatureCollection`.
    ///
    /// # Errors
    ///
    /// Returns [`HeatmapError`] if the text is not valid `GeoJSON` or is
    /// not a `FeatureCollection`.
    pub fn from_geojson_str(text: &str) -> Result<Self, HeatmapError> {
        match text.parse::<GeoJson>()? {
            GeoJson::FeatureCollection(collection) => Ok(Self::from_collection(collection)),
            GeoJson::Feature(_) => Err(HeatmapError::NotFeatureCollection { found: "Feature" }),
            GeoJson::Geometry(_) => Err(HeatmapError::NotFeatureCollection { found: "Geometry" }),
        }
    }

    /// Wraps an already parsed `FeatureCollection`.
    #[must_use]
    pub fn from_collection(collection: FeatureCollection) -> Self {
        let bounds = compute_bounds(&collection.features);
        log::debug!(
            "Loaded boundary layer with {} features",
            collection.features.len()
        );
        Self {
            features: collection.features,
            bounds,
        }
    }

    /// Returns all boundary features in their original order.
    #[must_use]
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Returns the number of boundary features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Returns `true` when the layer has no features.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Returns the bounding box of every feature geometry, or `None` when
    /// no feature carries a usable geometry.
    #[must_use]
    pub const fn bounds(&self) -> Option<MapBounds> {
        self.bounds
    }

    /// Finds the first feature whose normalized name equals `key`.
    ///
    /// The empty key never matches, even against a nameless feature.
    #[must_use]
    pub fn find_by_key(&self, key: &str) -> Option<&Feature> {
        if key.is_empty() {
            return None;
        }
        self.features.iter().find(|f| feature_key(f) == key)
    }
}

/// Returns a feature's `shapeName`, or the empty string when the property
/// is missing or not a string.
#[must_use]
pub fn shape_name(feature: &Feature) -> &str {
    feature
        .property(SHAPE_NAME_PROPERTY)
        .and_then(serde_json::Value::as_str)
        .unwrap_or("")
}

/// Returns the normalized join key of a feature.
#[must_use]
pub fn feature_key(feature: &Feature) -> String {
    normalize_name(shape_name(feature))
}

fn compute_bounds(features: &[Feature]) -> Option<MapBounds> {
    let mut bounds: Option<MapBounds> = None;

    for geometry in features.iter().filter_map(|f| f.geometry.clone()) {
        let Ok(geometry) = geo::Geometry::<f64>::try_from(geometry) else {
            continue;
        };
        let Some(rect) = geometry.bounding_rect() else {
            continue;
        };

        let (min, max) = (rect.min(), rect.max());
        bounds = Some(bounds.map_or(
            MapBounds {
                south: min.y,
                west: min.x,
                north: max.y,
                east: max.x,
            },
            |b| MapBounds {
                south: b.south.min(min.y),
                west: b.west.min(min.x),
                north: b.north.max(max.y),
                east: b.east.max(max.x),
            },
        ));
    }

    bounds
}
