use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use serde_with;

pub mod asset;
pub mod coordinate;
pub mod geojson;
pub mod layer;
pub mod service;

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WithDistance<T> {
    pub distance_meters: f64,
    #[serde(flatten)]
    pub content: T,
}

impl<T> WithDistance<T> {
    pub fn new(distance_meters: f64, content: T) -> Self {
        Self {
            distance_meters,
            content,
        }
    }
}

/// Sorts by ascending distance. Distances that cannot be compared keep their
/// relative order.
pub fn sort_by_distance<T>(values: &mut [WithDistance<T>]) {
    values.sort_by(|a, b| {
        a.distance_meters
            .partial_cmp(&b.distance_meters)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}
