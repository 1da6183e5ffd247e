use model::asset::MatchedAsset;
use schemars::JsonSchema;
use serde::Serialize;

/// Body of the request creation call. `matched_asset` is sent exactly as
/// the resident confirmed it.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct ServiceRequestPayload {
    pub service_code: String,
    pub lat: f64,
    pub long: f64,
    pub address_string: Option<String>,
    pub description: Option<String>,
    pub matched_asset: Option<MatchedAsset>,
}
