//! Marker placement for municipality polygons.
//!
//! The marker point is the mean of the outer ring's vertices, not an
//! area-weighted centroid. For a `MultiPolygon` only the part whose outer
//! ring has the most vertices is used, so a municipality with small
//! offshore islands keeps its marker on the main landmass. Holes are
//! ignored, and a closing vertex that repeats the first one is counted
//! once.

use geojson::{Feature, Geometry, Value};

/// A marker position in geographic coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Centroid {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
}

/// Resolves the marker position of a feature.
///
/// Returns `None` for features without geometry or with geometry other
/// than `Polygon`/`MultiPolygon`.
#[must_use]
pub fn resolve_feature_centroid(feature: &Feature) -> Option<Centroid> {
    feature.geometry.as_ref().and_then(resolve_centroid)
}

/// Resolves the marker position of a `Polygon` or `MultiPolygon`.
///
/// Returns `None` for every other geometry type and for polygons whose
/// outer ring carries no usable position.
#[must_use]
pub fn resolve_centroid(geometry: &Geometry) -> Option<Centroid> {
    match &geometry.value {
        Value::Polygon(rings) => rings.first().and_then(|outer| ring_mean(outer)),
        Value::MultiPolygon(polygons) => {
            let mut best: Option<&Vec<Vec<f64>>> = None;
            for outer in polygons.iter().filter_map(|rings| rings.first()) {
                // Strictly greater keeps the first part on ties.
                if best.is_none_or(|current| outer.len() > current.len()) {
                    best = Some(outer);
                }
            }
            best.and_then(|outer| ring_mean(outer))
        }
        _ => None,
    }
}

/// Averages the `[lng, lat]` positions of a ring.
fn ring_mean(ring: &[Vec<f64>]) -> Option<Centroid> {
    let ring = match ring {
        [first, .., last] if first == last => &ring[..ring.len() - 1],
        _ => ring,
    };

    let mut lat_sum = 0.0;
    let mut lng_sum = 0.0;
    let mut count = 0_u32;

    for position in ring {
        if let [lng, lat, ..] = position.as_slice() {
            lng_sum += lng;
            lat_sum += lat;
            count += 1;
        }
    }

    if count == 0 {
        return None;
    }

    let n = f64::from(count);
    Some(Centroid {
        lat: lat_sum / n,
        lng: lng_sum / n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(points: &[(f64, f64)]) -> Vec<Vec<f64>> {
        points.iter().map(|(x, y)| vec![*x, *y]).collect()
    }

    fn assert_close(actual: Centroid, lat: f64, lng: f64) {
        assert!(
            (actual.lat - lat).abs() < 1e-9 && (actual.lng - lng).abs() < 1e-9,
            "expected ({lat}, {lng}), got ({}, {})",
            actual.lat,
            actual.lng
        );
    }

    #[test]
    fn closed_square_resolves_to_its_center() {
        let square = ring(&[(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0), (0.0, 0.0)]);
        let geometry = Geometry::new(Value::Polygon(vec![square]));
        assert_close(resolve_centroid(&geometry).unwrap(), 1.0, 1.0);
    }

    #[test]
    fn open_square_resolves_to_its_center() {
        let square = ring(&[(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0)]);
        let geometry = Geometry::new(Value::Polygon(vec![square]));
        assert_close(resolve_centroid(&geometry).unwrap(), 1.0, 1.0);
    }

    #[test]
    fn coordinates_are_swapped_to_lat_lng() {
        let tri = ring(&[(-82.0, 23.0), (-81.0, 23.0), (-81.5, 24.0)]);
        let geometry = Geometry::new(Value::Polygon(vec![tri]));
        assert_close(resolve_centroid(&geometry).unwrap(), 70.0 / 3.0, -81.5);
    }

    #[test]
    fn vertex_mean_is_not_area_weighted() {
        // Dense vertices along the bottom edge pull the mean down.
        let outer = ring(&[
            (0.0, 0.0),
            (1.0, 0.0),
            (2.0, 0.0),
            (3.0, 0.0),
            (4.0, 0.0),
            (4.0, 4.0),
            (0.0, 4.0),
            (0.0, 0.0),
        ]);
        let geometry = Geometry::new(Value::Polygon(vec![outer]));
        assert_close(resolve_centroid(&geometry).unwrap(), 8.0 / 7.0, 2.0);
    }

    #[test]
    fn holes_are_ignored() {
        let outer = ring(&[(0.0, 0.0), (0.0, 4.0), (4.0, 4.0), (4.0, 0.0)]);
        let hole = ring(&[(3.0, 3.0), (3.0, 3.5), (3.5, 3.5), (3.5, 3.0)]);
        let geometry = Geometry::new(Value::Polygon(vec![outer, hole]));
        assert_close(resolve_centroid(&geometry).unwrap(), 2.0, 2.0);
    }

    #[test]
    fn multipolygon_uses_part_with_most_vertices() {
        let island = vec![ring(&[(10.0, 10.0), (10.0, 11.0), (11.0, 10.0)])];
        let mainland = vec![ring(&[
            (0.0, 0.0),
            (0.0, 2.0),
            (1.0, 3.0),
            (2.0, 2.0),
            (2.0, 0.0),
        ])];
        let geometry = Geometry::new(Value::MultiPolygon(vec![island, mainland]));
        assert_close(resolve_centroid(&geometry).unwrap(), 1.4, 1.0);
    }

    #[test]
    fn multipolygon_tie_keeps_first_part() {
        let first = vec![ring(&[(0.0, 0.0), (0.0, 2.0), (2.0, 0.0)])];
        let second = vec![ring(&[(10.0, 10.0), (10.0, 12.0), (12.0, 10.0)])];
        let geometry = Geometry::new(Value::MultiPolygon(vec![first, second]));
        let centroid = resolve_centroid(&geometry).unwrap();
        assert!(centroid.lat < 5.0 && centroid.lng < 5.0);
    }

    #[test]
    fn unsupported_geometry_has_no_centroid() {
        let point = Geometry::new(Value::Point(vec![1.0, 2.0]));
        assert!(resolve_centroid(&point).is_none());

        let line = Geometry::new(Value::LineString(ring(&[(0.0, 0.0), (1.0, 1.0)])));
        assert!(resolve_centroid(&line).is_none());
    }

    #[test]
    fn empty_polygon_has_no_centroid() {
        assert!(resolve_centroid(&Geometry::new(Value::Polygon(vec![]))).is_none());
        assert!(resolve_centroid(&Geometry::new(Value::MultiPolygon(vec![]))).is_none());
    }

    #[test]
    fn feature_without_geometry_has_no_centroid() {
        let feature = Feature {
            bbox: None,
            geometry: None,
            id: None,
            properties: None,
            foreign_members: None,
        };
        assert!(resolve_feature_centroid(&feature).is_none());
    }
}
