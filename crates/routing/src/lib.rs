pub mod decision;
pub mod road;

pub use decision::{RoutingEngine, RoutingError, RoutingState};
pub use road::RoadMatchSettings;
