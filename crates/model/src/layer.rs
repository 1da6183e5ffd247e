use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utility::{
    id::{HasId, Id},
    serde::null_as_default,
};

use crate::{
    coordinate::Coordinate,
    geojson::{Feature, GeoJson, GeometryError},
};

/// A named overlay such as parks, storm drains or street lights.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MapLayer {
    pub id: Id<MapLayer>,
    pub name: String,
    #[serde(default)]
    pub geojson: Value,
    #[serde(default)]
    pub fill_color: String,
    #[serde(default)]
    pub stroke_color: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub service_codes: BTreeSet<String>,
    #[serde(default = "visible_by_default")]
    pub visible_on_map: bool,
}

fn visible_by_default() -> bool {
    true
}

impl HasId for MapLayer {
    type IdType = i64;
}

impl MapLayer {
    /// A layer without service codes is shown for every service.
    pub fn applies_to(&self, service_code: &str) -> bool {
        self.service_codes.is_empty() || self.service_codes.contains(service_code)
    }

    /// Extracts the features of this layer. Features whose geometry is
    /// missing or broken are left out; a document that cannot be parsed at
    /// all is an error.
    pub fn features(&self) -> Result<Vec<MapFeature>, GeometryError> {
        if GeoJson::is_empty_document(Some(&self.geojson)) {
            return Ok(Vec::new());
        }
        let features = match GeoJson::parse(&self.geojson)? {
            GeoJson::FeatureCollection(features) => features,
            GeoJson::Feature(feature) => vec![feature],
            geometry => vec![Feature {
                geometry: Ok(Some(Box::new(geometry))),
                properties: Map::new(),
            }],
        };
        Ok(features
            .into_iter()
            .enumerate()
            .filter_map(|(index, feature)| match feature.geometry {
                Ok(Some(geometry)) => Some(MapFeature {
                    index,
                    geometry: *geometry,
                    properties: feature.properties,
                }),
                _ => None,
            })
            .collect())
    }
}

/// A single feature of a [`MapLayer`]. `index` is the position of the
/// feature inside the layer document.
#[derive(Debug, Clone, PartialEq)]
pub struct MapFeature {
    pub index: usize,
    pub geometry: GeoJson,
    pub properties: Map<String, Value>,
}

impl MapFeature {
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Representative location used for distance ranking: the point itself,
    /// the middle vertex of a line, or the vertex mean of a polygon's outer
    /// ring.
    pub fn anchor(&self) -> Option<Coordinate> {
        anchor_of(&self.geometry)
    }
}

fn anchor_of(geometry: &GeoJson) -> Option<Coordinate> {
    match geometry {
        GeoJson::Point(point) => Some(*point),
        GeoJson::LineString(line) => line.get(line.len() / 2).copied(),
        GeoJson::Polygon(rings) => rings.first().and_then(|ring| vertex_mean(ring)),
        GeoJson::MultiPolygon(polygons) => polygons
            .first()
            .and_then(|rings| rings.first())
            .and_then(|ring| vertex_mean(ring)),
        GeoJson::Feature(feature) => match &feature.geometry {
            Ok(Some(geometry)) => anchor_of(geometry),
            _ => None,
        },
        GeoJson::FeatureCollection(_) | GeoJson::Other(_) => None,
    }
}

fn vertex_mean(ring: &[Coordinate]) -> Option<Coordinate> {
    // ignore the closing vertex if the ring repeats its first one
    let vertices = match ring {
        [first, rest @ .., last] if first == last && !rest.is_empty() => {
            &ring[..ring.len() - 1]
        }
        _ => ring,
    };
    if vertices.is_empty() {
        return None;
    }
    let count = vertices.len() as f64;
    let (lat, lng) = vertices
        .iter()
        .fold((0.0, 0.0), |(lat, lng), c| (lat + c.lat, lng + c.lng));
    Some(Coordinate::new(lat / count, lng / count))
}
