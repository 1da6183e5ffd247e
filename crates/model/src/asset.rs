use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A map layer feature the resident explicitly attached to a report.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MatchedAsset {
    pub layer_name: String,
    pub asset_id: Option<String>,
    pub asset_type: Option<String>,
    pub properties: Map<String, Value>,
    pub distance_meters: f64,
}
