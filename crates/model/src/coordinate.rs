use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::geo;

/// A WGS84 location. GeoJSON positions are `[lng, lat]`; the order is
/// swapped once while parsing and never again downstream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Reads a GeoJSON position. Additional members such as altitude are
    /// ignored.
    pub fn from_position(position: &[f64]) -> Option<Self> {
        match position {
            [lng, lat, ..] => Some(Self::new(*lat, *lng)),
            _ => None,
        }
    }

    pub fn distance_meters_to(&self, other: &Coordinate) -> f64 {
        geo::haversine_distance_m(self.lat, self.lng, other.lat, other.lng)
    }
}

/// One closed boundary curve. The closing vertex may or may not repeat the
/// first one.
pub type Ring = Vec<Coordinate>;

/// Index 0 is the outer ring, every further ring is a hole.
pub type PolygonRings = Vec<Ring>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_read_as_lng_lat() {
        let coordinate = Coordinate::from_position(&[-74.5, 40.25, 12.0]).unwrap();
        assert_eq!(coordinate, Coordinate::new(40.25, -74.5));
        assert!(Coordinate::from_position(&[1.0]).is_none());
    }
}
