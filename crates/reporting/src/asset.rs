use model::{
    asset::MatchedAsset,
    coordinate::Coordinate,
    layer::{MapFeature, MapLayer},
    sort_by_distance, WithDistance,
};
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::{Map, Value};
use utility::{geo, id::Id, serde::scalar_to_string};

/// `asset_id`, falling back to `id`.
pub fn resolve_asset_id(properties: &Map<String, Value>) -> Option<String> {
    ["asset_id", "id"]
        .iter()
        .find_map(|key| properties.get(*key).and_then(scalar_to_string))
}

/// `asset_type`, falling back to `type`.
pub fn resolve_asset_type(properties: &Map<String, Value>) -> Option<String> {
    ["asset_type", "type"]
        .iter()
        .find_map(|key| properties.get(*key).and_then(scalar_to_string))
}

/// Builds the record attached to a report after the resident confirmed a
/// feature. Explicit selections carry no distance.
pub fn matched_asset(layer: &MapLayer, feature: &MapFeature) -> MatchedAsset {
    asset_record(layer.name.clone(), feature)
}

fn asset_record(layer_name: String, feature: &MapFeature) -> MatchedAsset {
    MatchedAsset {
        layer_name,
        asset_id: resolve_asset_id(&feature.properties),
        asset_type: resolve_asset_type(&feature.properties),
        properties: feature.properties.clone(),
        distance_meters: 0.0,
    }
}

/// A feature the resident clicked but has not confirmed yet.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightedAsset {
    pub layer_id: Id<MapLayer>,
    pub layer_name: String,
    pub feature: MapFeature,
}

/// Asset attached to the current report. Only [`AssetSelection::confirm`]
/// produces a [`MatchedAsset`]; proximity alone never does.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetSelection {
    highlighted: Option<HighlightedAsset>,
    selected: Option<MatchedAsset>,
}

impl AssetSelection {
    pub fn highlight(&mut self, layer: &MapLayer, feature: MapFeature) {
        self.highlighted = Some(HighlightedAsset {
            layer_id: layer.id,
            layer_name: layer.name.clone(),
            feature,
        });
    }

    pub fn highlighted(&self) -> Option<&HighlightedAsset> {
        self.highlighted.as_ref()
    }

    pub fn dismiss(&mut self) {
        self.highlighted = None;
    }

    pub fn confirm(&mut self) -> Option<&MatchedAsset> {
        let highlighted = self.highlighted.take()?;
        self.selected = Some(asset_record(highlighted.layer_name, &highlighted.feature));
        self.selected.as_ref()
    }

    pub fn selected(&self) -> Option<&MatchedAsset> {
        self.selected.as_ref()
    }

    pub fn clear(&mut self) {
        self.highlighted = None;
        self.selected = None;
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct NearbyAsset {
    pub layer_id: Id<MapLayer>,
    pub layer_name: String,
    pub feature_index: usize,
    pub asset_id: Option<String>,
}

/// Features of `layers` within `radius_meters` of `point`, nearest first.
/// Only used to offer candidates; nothing here attaches an asset to a
/// report.
pub fn rank_by_proximity<'a, I>(
    point: &Coordinate,
    layers: I,
    radius_meters: f64,
) -> Vec<WithDistance<NearbyAsset>>
where
    I: IntoIterator<Item = (&'a MapLayer, &'a [MapFeature])>,
{
    let bbox = geo::bounding_box_around(point.lat, point.lng, radius_meters);
    let mut nearby = Vec::new();
    for (layer, features) in layers {
        for feature in features {
            let Some(anchor) = feature.anchor() else {
                continue;
            };
            if !bbox.contains(anchor.lat, anchor.lng) {
                continue;
            }
            let distance = point.distance_meters_to(&anchor);
            if distance <= radius_meters {
                nearby.push(WithDistance::new(
                    distance,
                    NearbyAsset {
                        layer_id: layer.id,
                        layer_name: layer.name.clone(),
                        feature_index: feature.index,
                        asset_id: resolve_asset_id(&feature.properties),
                    },
                ));
            }
        }
    }
    sort_by_distance(&mut nearby);
    nearby
}
