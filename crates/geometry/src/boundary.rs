use model::{
    coordinate::{Coordinate, PolygonRings},
    geojson::{GeoJson, GeometryError},
};
use serde_json::Value;

use crate::{flatten::flatten, ring::point_in_polygon_with_holes};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Containment {
    Inside,
    Outside,
    /// No boundary is configured.
    Unrestricted,
}

impl Containment {
    pub fn allows_submission(self) -> bool {
        !matches!(self, Containment::Outside)
    }
}

/// A jurisdiction boundary, flattened once and reused for every check.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    polygons: Vec<PolygonRings>,
}

impl Boundary {
    /// `Ok(None)` means no boundary is configured.
    pub fn from_document(
        document: Option<&Value>,
    ) -> Result<Option<Self>, GeometryError> {
        let document = match document {
            Some(document) if !GeoJson::is_empty_document(Some(document)) => document,
            _ => return Ok(None),
        };
        let polygons = flatten(GeoJson::parse(document)?);
        if polygons.is_empty() {
            return Err(GeometryError::NoPolygons);
        }
        Ok(Some(Self { polygons }))
    }

    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    /// Union semantics: inside any one polygon is inside the boundary.
    pub fn contains(&self, point: &Coordinate) -> bool {
        self.polygons
            .iter()
            .any(|rings| point_in_polygon_with_holes(point, rings))
    }

    pub fn containment(&self, point: &Coordinate) -> Containment {
        if self.contains(point) {
            Containment::Inside
        } else {
            Containment::Outside
        }
    }
}

/// Evaluates a point against an optional boundary document without applying
/// any policy to errors.
pub fn evaluate(
    point: &Coordinate,
    document: Option<&Value>,
) -> Result<Containment, GeometryError> {
    Ok(match Boundary::from_document(document)? {
        Some(boundary) => boundary.containment(point),
        None => Containment::Unrestricted,
    })
}

/// The fail-open policy: broken boundary data must never keep a resident
/// from filing a report, so every error counts as inside.
pub fn fail_open(result: Result<Containment, GeometryError>) -> bool {
    match result {
        Ok(containment) => containment.allows_submission(),
        Err(why) => {
            log::warn!("boundary check failed, treating location as inside: {}", why);
            true
        }
    }
}

pub fn is_inside_boundary(point: &Coordinate, document: Option<&Value>) -> bool {
    fail_open(evaluate(point, document))
}
