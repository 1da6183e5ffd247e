use model::{
    coordinate::{Coordinate, PolygonRings},
    geojson::{Feature, GeoJson},
};
use serde_json::Value;

/// An outer ring needs at least this many distinct vertices to enclose
/// anything. A closing vertex that repeats the first one does not count.
pub const MIN_RING_VERTICES: usize = 3;

/// Collects every polygon of a document. Each `MultiPolygon` member becomes
/// its own entry. Points, lines and unsupported types contribute nothing.
/// Features with a broken geometry and polygons whose outer ring is
/// degenerate are skipped.
pub fn flatten(geojson: GeoJson) -> Vec<PolygonRings> {
    let mut polygons = Vec::new();
    collect(geojson, &mut polygons);
    polygons
}

/// Parses and flattens a raw document. A document that cannot be parsed
/// yields no polygons.
pub fn flatten_document(value: &Value) -> Vec<PolygonRings> {
    match GeoJson::parse(value) {
        Ok(geojson) => flatten(geojson),
        Err(why) => {
            log::warn!("ignoring unparsable GeoJSON document: {}", why);
            Vec::new()
        }
    }
}

fn collect(geojson: GeoJson, polygons: &mut Vec<PolygonRings>) {
    match geojson {
        GeoJson::Polygon(rings) => collect_polygon(rings, polygons),
        GeoJson::MultiPolygon(members) => {
            for rings in members {
                collect_polygon(rings, polygons);
            }
        }
        GeoJson::Feature(feature) => collect_feature(feature, polygons),
        GeoJson::FeatureCollection(features) => {
            for feature in features {
                collect_feature(feature, polygons);
            }
        }
        GeoJson::Point(_) | GeoJson::LineString(_) => {}
        GeoJson::Other(kind) => {
            log::debug!("skipping unsupported geometry type {}", kind);
        }
    }
}

fn collect_polygon(rings: PolygonRings, polygons: &mut Vec<PolygonRings>) {
    let usable = rings
        .first()
        .is_some_and(|outer| vertex_count(outer) >= MIN_RING_VERTICES);
    if usable {
        polygons.push(rings);
    } else {
        log::warn!("skipping polygon without a usable outer ring");
    }
}

fn vertex_count(ring: &[Coordinate]) -> usize {
    match ring {
        [first, .., last] if first == last => ring.len() - 1,
        _ => ring.len(),
    }
}

fn collect_feature(feature: Feature, polygons: &mut Vec<PolygonRings>) {
    match feature.geometry {
        Ok(Some(geometry)) => collect(*geometry, polygons),
        Ok(None) => {}
        Err(why) => log::warn!("skipping feature with broken geometry: {}", why),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn line_strings_have_no_polygons() {
        let polygons = flatten_document(&json!({
            "type": "LineString",
            "coordinates": [[0.0, 0.0], [1.0, 1.0]]
        }));
        assert!(polygons.is_empty());
    }

    #[test]
    fn multi_polygon_members_are_separate_entries() {
        let polygons = flatten_document(&json!({
            "type": "MultiPolygon",
            "coordinates": [
                [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]],
                [
                    [[5.0, 5.0], [9.0, 5.0], [9.0, 9.0]],
                    [[6.0, 6.0], [7.0, 6.0], [7.0, 7.0]]
                ]
            ]
        }));
        assert_eq!(polygons.len(), 2);
        assert_eq!(polygons[0].len(), 1);
        assert_eq!(polygons[1].len(), 2);
    }

    #[test]
    fn degenerate_polygons_are_dropped() {
        assert!(flatten_document(&json!({ "type": "Polygon", "coordinates": [] })).is_empty());
        assert!(flatten_document(&json!({ "type": "Polygon", "coordinates": [[]] })).is_empty());
        let polygons = flatten_document(&json!({
            "type": "MultiPolygon",
            "coordinates": [
                [[]],
                [[[0.0, 0.0], [1.0, 0.0]]],
                [[[0.0, 0.0], [1.0, 0.0], [0.0, 0.0]]],
                [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]]
            ]
        }));
        assert_eq!(polygons.len(), 1);
    }

    #[test]
    fn walks_collections_and_skips_broken_siblings() {
        let polygons = flatten_document(&json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "geometry": { "type": "Polygon", "coordinates": 3 } },
                {
                    "type": "Feature",
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]]
                    }
                },
                { "type": "Feature", "geometry": { "type": "Point", "coordinates": [0.0, 0.0] } },
                "not a feature"
            ]
        }));
        assert_eq!(polygons.len(), 1);
    }

    #[test]
    fn unparsable_documents_are_empty() {
        assert!(flatten_document(&json!({ "type": "Polygon" })).is_empty());
        assert!(flatten_document(&json!("Polygon")).is_empty());
        assert!(flatten_document(&json!({ "type": "GeometryCollection" })).is_empty());
    }
}
