use model::coordinate::{Coordinate, Ring};

/// Crossing number test: casts a ray from `point` towards increasing
/// longitude and toggles on every edge it crosses. The ring is treated as
/// closed whether or not the last vertex repeats the first.
///
/// An edge only counts when its end points lie strictly on opposite sides of
/// the ray's latitude, so horizontal edges never count and a vertex touching
/// the ray is counted once.
pub fn point_in_ring(point: &Coordinate, ring: &[Coordinate]) -> bool {
    let Some(mut previous) = ring.last() else {
        return false;
    };
    let mut inside = false;
    for current in ring {
        if (current.lat > point.lat) != (previous.lat > point.lat) {
            let crossing_lng = (previous.lng - current.lng) * (point.lat - current.lat)
                / (previous.lat - current.lat)
                + current.lng;
            if point.lng < crossing_lng {
                inside = !inside;
            }
        }
        previous = current;
    }
    inside
}

/// Inside the outer ring (index 0) and outside every hole.
pub fn point_in_polygon_with_holes(point: &Coordinate, rings: &[Ring]) -> bool {
    match rings.split_first() {
        Some((outer, holes)) => {
            point_in_ring(point, outer)
                && !holes.iter().any(|hole| point_in_ring(point, hole))
        }
        None => false,
    }
}
