use chrono::{DateTime, Local};
use geometry::boundary::{self, Boundary, Containment};
use indexmap::IndexMap;
use model::{
    coordinate::Coordinate,
    geojson::GeometryError,
    layer::{MapFeature, MapLayer},
};
use serde_json::Value;
use utility::id::Id;

use crate::source::{ConfigSource, SourceResult};

#[derive(Debug, Clone, Default)]
enum BoundaryState {
    #[default]
    Pending,
    Ready(Result<Option<Boundary>, GeometryError>),
}

#[derive(Debug)]
struct LoadedLayer {
    layer: MapLayer,
    // parsed once per load, ordered by feature index
    features: Vec<MapFeature>,
}

impl LoadedLayer {
    fn new(layer: MapLayer) -> Self {
        let features = layer.features().unwrap_or_else(|why| {
            log::warn!(
                "layer {} ({}) has no usable features: {}",
                layer.name,
                layer.id,
                why
            );
            Vec::new()
        });
        Self { layer, features }
    }
}

/// Reference data of one reporting session: the jurisdiction boundary and
/// the map layers. Loaded once, then only read. A reload simply replaces
/// the cached data.
#[derive(Debug, Default)]
pub struct ReportingSession {
    boundary: BoundaryState,
    // keeps the configured layer order
    layers: IndexMap<Id<MapLayer>, LoadedLayer>,
    loaded_at: Option<DateTime<Local>>,
}

impl ReportingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load<S>(&mut self, source: &S) -> SourceResult<()>
    where
        S: ConfigSource + ?Sized,
    {
        let (boundary, layers) =
            futures::try_join!(source.boundary(), source.map_layers())?;
        self.replace(boundary.as_ref(), layers);
        Ok(())
    }

    /// Replaces the cached reference data; the last write wins.
    pub fn replace(&mut self, boundary: Option<&Value>, layers: Vec<MapLayer>) {
        let prepared = Boundary::from_document(boundary);
        match &prepared {
            Ok(Some(boundary)) => log::info!(
                "loaded boundary with {} polygon(s)",
                boundary.polygon_count()
            ),
            Ok(None) => log::info!("no boundary configured"),
            Err(why) => log::warn!("boundary cannot be used: {}", why),
        }
        self.boundary = BoundaryState::Ready(prepared);
        self.layers = layers
            .into_iter()
            .map(|layer| (layer.id, LoadedLayer::new(layer)))
            .collect();
        self.loaded_at = Some(Local::now());
        log::info!("loaded {} map layer(s)", self.layers.len());
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.boundary, BoundaryState::Ready(_))
    }

    pub fn loaded_at(&self) -> Option<DateTime<Local>> {
        self.loaded_at
    }

    /// Containment of `point` without the fail-open policy applied. Before
    /// the data is loaded every location is unrestricted.
    pub fn evaluate_location(
        &self,
        point: &Coordinate,
    ) -> Result<Containment, GeometryError> {
        match &self.boundary {
            BoundaryState::Pending => {
                log::debug!("boundary not loaded yet, location is unrestricted");
                Ok(Containment::Unrestricted)
            }
            BoundaryState::Ready(Ok(Some(boundary))) => Ok(boundary.containment(point)),
            BoundaryState::Ready(Ok(None)) => Ok(Containment::Unrestricted),
            BoundaryState::Ready(Err(why)) => Err(why.clone()),
        }
    }

    pub fn is_inside(&self, point: &Coordinate) -> bool {
        boundary::fail_open(self.evaluate_location(point))
    }

    pub fn layer(&self, id: &Id<MapLayer>) -> Option<&MapLayer> {
        self.layers.get(id).map(|loaded| &loaded.layer)
    }

    pub fn layers(&self) -> impl Iterator<Item = &MapLayer> {
        self.layers.values().map(|loaded| &loaded.layer)
    }

    /// Layers rendered on the map while `service_code` is selected.
    pub fn layers_for<'a>(
        &'a self,
        service_code: &'a str,
    ) -> impl Iterator<Item = &'a MapLayer> + 'a {
        self.features_for(service_code).map(|(layer, _)| layer)
    }

    /// Like [`Self::layers_for`], together with the parsed features of each
    /// layer.
    pub fn features_for<'a>(
        &'a self,
        service_code: &'a str,
    ) -> impl Iterator<Item = (&'a MapLayer, &'a [MapFeature])> + 'a {
        self.layers
            .values()
            .filter(move |loaded| {
                loaded.layer.visible_on_map && loaded.layer.applies_to(service_code)
            })
            .map(|loaded| (&loaded.layer, loaded.features.as_slice()))
    }

    /// The feature at `index` of the layer document, if it has a usable
    /// geometry.
    pub fn feature(
        &self,
        layer_id: &Id<MapLayer>,
        index: usize,
    ) -> Option<&MapFeature> {
        let features = &self.layers.get(layer_id)?.features;
        features
            .binary_search_by_key(&index, |feature| feature.index)
            .ok()
            .map(|position| &features[position])
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::source::InMemorySource;

    fn square() -> Value {
        json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [0.0, 10.0], [10.0, 10.0], [10.0, 0.0]]]
        })
    }

    fn layers() -> Vec<MapLayer> {
        serde_json::from_value(json!([
            {
                "id": 2,
                "name": "Storm Drains",
                "service_codes": ["drain"],
                "geojson": {
                    "type": "FeatureCollection",
                    "features": [
                        { "type": "Feature", "geometry": null },
                        {
                            "type": "Feature",
                            "geometry": { "type": "Point", "coordinates": [-74.0, 40.0] },
                            "properties": { "asset_id": "SD-1" }
                        }
                    ]
                }
            },
            { "id": 1, "name": "Parks" },
            { "id": 3, "name": "Hidden", "visible_on_map": false }
        ]))
        .unwrap()
    }

    #[test]
    fn everything_is_inside_before_loading() {
        let session = ReportingSession::new();
        assert!(!session.is_loaded());
        assert_eq!(
            session.evaluate_location(&Coordinate::new(50.0, 50.0)),
            Ok(Containment::Unrestricted)
        );
        assert!(session.is_inside(&Coordinate::new(50.0, 50.0)));
    }

    #[tokio::test]
    async fn loads_boundary_and_layers() {
        let source = InMemorySource::new(Some(square()), layers(), Vec::new());
        let mut session = ReportingSession::new();
        session.load(&source).await.unwrap();

        assert!(session.is_loaded());
        assert!(session.loaded_at().is_some());
        assert!(session.is_inside(&Coordinate::new(5.0, 5.0)));
        assert!(!session.is_inside(&Coordinate::new(50.0, 50.0)));

        let names = session.layers().map(|l| l.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["Storm Drains", "Parks", "Hidden"]);
        let for_drains = session
            .layers_for("drain")
            .map(|l| l.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(for_drains, ["Storm Drains", "Parks"]);
        let for_potholes = session
            .layers_for("pothole")
            .map(|l| l.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(for_potholes, ["Parks"]);
        assert_eq!(session.layer(&Id::new(1)).map(|l| l.name.as_str()), Some("Parks"));
    }

    #[tokio::test]
    async fn features_are_parsed_once_per_load() {
        let source = InMemorySource::new(None, layers(), Vec::new());
        let mut session = ReportingSession::new();
        session.load(&source).await.unwrap();

        let drains = Id::new(2);
        let feature = session.feature(&drains, 1).unwrap();
        assert_eq!(feature.property("asset_id"), Some(&json!("SD-1")));
        assert!(session.feature(&drains, 0).is_none());
        assert!(session.feature(&drains, 2).is_none());
        assert!(session.feature(&Id::new(1), 0).is_none());

        let counts = session
            .features_for("drain")
            .map(|(layer, features)| (layer.name.as_str(), features.len()))
            .collect::<Vec<_>>();
        assert_eq!(counts, [("Storm Drains", 1), ("Parks", 0)]);
    }

    #[tokio::test]
    async fn reload_replaces_cached_data() {
        let mut session = ReportingSession::new();
        session
            .load(&InMemorySource::new(Some(square()), layers(), Vec::new()))
            .await
            .unwrap();
        assert!(!session.is_inside(&Coordinate::new(50.0, 50.0)));

        session.load(&InMemorySource::default()).await.unwrap();
        assert!(session.is_inside(&Coordinate::new(50.0, 50.0)));
        assert_eq!(session.layers().count(), 0);
    }

    #[test]
    fn broken_boundary_fails_open() {
        let mut session = ReportingSession::new();
        session.replace(Some(&json!({ "type": "Polygon", "coordinates": null })), Vec::new());
        let point = Coordinate::new(50.0, 50.0);
        assert!(session.evaluate_location(&point).is_err());
        assert!(session.is_inside(&point));
    }
}
