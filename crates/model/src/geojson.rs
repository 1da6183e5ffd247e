use std::{error, fmt};

use ::geojson::{Geometry, Value as Shape};
use serde_json::{Map, Value};

use crate::coordinate::{Coordinate, PolygonRings, Ring};

#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    NotAnObject,
    MissingType,
    MissingFeatures,
    /// The `geojson` decoder rejected a geometry of type `kind`.
    Malformed { kind: String, reason: String },
    InvalidPosition { kind: String },
    /// The document parsed, but contains no usable polygon at all.
    NoPolygons,
}

impl GeometryError {
    fn malformed(kind: &str, why: ::geojson::Error) -> Self {
        Self::Malformed {
            kind: kind.to_owned(),
            reason: why.to_string(),
        }
    }
}

impl error::Error for GeometryError {}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GeometryError::NotAnObject => write!(f, "GeoJSON value is not an object"),
            GeometryError::MissingType => write!(f, "GeoJSON object has no type"),
            GeometryError::MissingFeatures => {
                write!(f, "FeatureCollection has no features array")
            }
            GeometryError::Malformed { kind, reason } => {
                write!(f, "malformed {kind}: {reason}")
            }
            GeometryError::InvalidPosition { kind } => {
                write!(f, "{kind} has a position without longitude and latitude")
            }
            GeometryError::NoPolygons => write!(f, "document contains no polygons"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GeoJson {
    Point(Coordinate),
    LineString(Vec<Coordinate>),
    Polygon(PolygonRings),
    MultiPolygon(Vec<PolygonRings>),
    Feature(Feature),
    FeatureCollection(Vec<Feature>),
    /// Any type this crate does not interpret, e.g. `MultiPoint` or
    /// `GeometryCollection`.
    Other(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// `Ok(None)` is a feature with a `null` geometry. A broken geometry is
    /// kept as an error so that sibling features remain usable.
    pub geometry: Result<Option<Box<GeoJson>>, GeometryError>,
    pub properties: Map<String, Value>,
}

impl Feature {
    fn parse(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self {
                geometry: Err(GeometryError::NotAnObject),
                properties: Map::new(),
            };
        };
        let geometry = match object.get("geometry") {
            None | Some(Value::Null) => Ok(None),
            Some(geometry) => GeoJson::parse(geometry).map(|g| Some(Box::new(g))),
        };
        let properties = match object.get("properties") {
            Some(Value::Object(properties)) => properties.clone(),
            _ => Map::new(),
        };
        Self {
            geometry,
            properties,
        }
    }
}

impl GeoJson {
    /// Parses a document. Collections are split here so that every feature
    /// is decoded on its own; geometries are decoded by the `geojson` crate
    /// and converted to [`Coordinate`]s once.
    pub fn parse(value: &Value) -> Result<Self, GeometryError> {
        let object = value.as_object().ok_or(GeometryError::NotAnObject)?;
        let kind = object
            .get("type")
            .and_then(Value::as_str)
            .ok_or(GeometryError::MissingType)?;

        match kind {
            "FeatureCollection" => {
                let features = object
                    .get("features")
                    .and_then(Value::as_array)
                    .ok_or(GeometryError::MissingFeatures)?;
                Ok(GeoJson::FeatureCollection(
                    features.iter().map(Feature::parse).collect(),
                ))
            }
            "Feature" => Ok(GeoJson::Feature(Feature::parse(value))),
            "Point" | "MultiPoint" | "LineString" | "MultiLineString" | "Polygon"
            | "MultiPolygon" | "GeometryCollection" => {
                let geometry = Geometry::from_json_value(value.clone())
                    .map_err(|why| GeometryError::malformed(kind, why))?;
                GeoJson::from_shape(kind, geometry.value)
            }
            other => Ok(GeoJson::Other(other.to_owned())),
        }
    }

    fn from_shape(kind: &str, shape: Shape) -> Result<Self, GeometryError> {
        match shape {
            Shape::Point(position) => coordinate(kind, &position).map(GeoJson::Point),
            Shape::LineString(line) => ring(kind, &line).map(GeoJson::LineString),
            Shape::Polygon(rings) => polygon(kind, &rings).map(GeoJson::Polygon),
            Shape::MultiPolygon(polygons) => polygons
                .iter()
                .map(|rings| polygon(kind, rings))
                .collect::<Result<Vec<_>, _>>()
                .map(GeoJson::MultiPolygon),
            Shape::MultiPoint(_)
            | Shape::MultiLineString(_)
            | Shape::GeometryCollection(_) => Ok(GeoJson::Other(kind.to_owned())),
        }
    }

    /// `null`, a missing document and `{}` all mean that nothing was
    /// configured.
    pub fn is_empty_document(value: Option<&Value>) -> bool {
        match value {
            None | Some(Value::Null) => true,
            Some(Value::Object(object)) => object.is_empty(),
            Some(_) => false,
        }
    }
}

fn coordinate(kind: &str, position: &[f64]) -> Result<Coordinate, GeometryError> {
    Coordinate::from_position(position).ok_or_else(|| GeometryError::InvalidPosition {
        kind: kind.to_owned(),
    })
}

fn ring(kind: &str, positions: &[Vec<f64>]) -> Result<Ring, GeometryError> {
    positions
        .iter()
        .map(|position| coordinate(kind, position))
        .collect()
}

fn polygon(
    kind: &str,
    rings: &[Vec<Vec<f64>>],
) -> Result<PolygonRings, GeometryError> {
    rings.iter().map(|positions| ring(kind, positions)).collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn polygon_positions_are_swapped_to_lat_lng() {
        let parsed = GeoJson::parse(&json!({
            "type": "Polygon",
            "coordinates": [[[-74.0, 40.0], [-73.0, 40.0], [-73.0, 41.0]]]
        }))
        .unwrap();
        let GeoJson::Polygon(rings) = parsed else {
            panic!("expected a polygon");
        };
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0][0], Coordinate::new(40.0, -74.0));
        assert_eq!(rings[0][2], Coordinate::new(41.0, -73.0));
    }

    #[test]
    fn broken_feature_does_not_poison_the_collection() {
        let parsed = GeoJson::parse(&json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "geometry": { "type": "Polygon" }, "properties": null },
                {
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [1.0, 2.0] },
                    "properties": { "id": 3 }
                },
                { "type": "Feature", "geometry": null }
            ]
        }))
        .unwrap();
        let GeoJson::FeatureCollection(features) = parsed else {
            panic!("expected a collection");
        };
        assert!(matches!(
            &features[0].geometry,
            Err(GeometryError::Malformed { kind, .. }) if kind == "Polygon"
        ));
        assert_eq!(
            features[1].geometry,
            Ok(Some(Box::new(GeoJson::Point(Coordinate::new(2.0, 1.0)))))
        );
        assert_eq!(features[1].properties.get("id"), Some(&json!(3)));
        assert_eq!(features[2].geometry, Ok(None));
    }

    #[test]
    fn uninterpreted_types_are_kept_as_other() {
        let parsed = GeoJson::parse(&json!({
            "type": "MultiLineString",
            "coordinates": [[[0.0, 0.0], [1.0, 1.0]]]
        }));
        assert_eq!(parsed, Ok(GeoJson::Other("MultiLineString".to_owned())));
        let parsed = GeoJson::parse(&json!({ "type": "Topology" }));
        assert_eq!(parsed, Ok(GeoJson::Other("Topology".to_owned())));
    }

    #[test]
    fn malformed_values_are_errors() {
        assert_eq!(GeoJson::parse(&json!([1, 2])), Err(GeometryError::NotAnObject));
        assert_eq!(GeoJson::parse(&json!({ "a": 1 })), Err(GeometryError::MissingType));
        let non_numeric = json!({ "type": "Polygon", "coordinates": [[["x", 1]]] });
        assert!(GeoJson::parse(&non_numeric).is_err());
        assert!(GeoJson::parse(&json!({ "type": "Polygon", "coordinates": "oops" })).is_err());
        assert_eq!(
            GeoJson::parse(&json!({ "type": "FeatureCollection" })),
            Err(GeometryError::MissingFeatures)
        );
    }

    #[test]
    fn empty_documents() {
        assert!(GeoJson::is_empty_document(None));
        assert!(GeoJson::is_empty_document(Some(&json!(null))));
        assert!(GeoJson::is_empty_document(Some(&json!({}))));
        assert!(!GeoJson::is_empty_document(Some(&json!({ "type": "Polygon" }))));
    }
}
