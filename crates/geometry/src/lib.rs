pub use model::geojson::{GeoJson, GeometryError};

pub mod boundary;
pub mod flatten;
pub mod ring;
