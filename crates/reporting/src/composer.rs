use std::{error, fmt};

use model::{
    asset::MatchedAsset,
    coordinate::Coordinate,
    layer::MapLayer,
    service::{RoutingMode, RoutingVerdict, ServiceDefinition},
};
use routing::{RoutingEngine, RoutingState};
use utility::id::Id;

use crate::{
    asset::{AssetSelection, HighlightedAsset},
    payload::ServiceRequestPayload,
    session::ReportingSession,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposeError {
    NoService,
    NoLocation,
    OutOfBounds,
    Blocked(RoutingVerdict),
}

impl error::Error for ComposeError {}

impl fmt::Display for ComposeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ComposeError::NoService => write!(f, "no service selected"),
            ComposeError::NoLocation => write!(f, "no location selected"),
            ComposeError::OutOfBounds => {
                write!(f, "location is outside the jurisdiction")
            }
            ComposeError::Blocked(verdict) => {
                write!(f, "request is handled by a third party: {}", verdict.message)
            }
        }
    }
}

/// State of one service request being composed: selected service, address,
/// location and asset, together with the containment and routing verdicts
/// that gate submission.
#[derive(Debug)]
pub struct RequestComposer {
    engine: RoutingEngine,
    service: Option<ServiceDefinition>,
    address: Option<String>,
    description: Option<String>,
    location: Option<Coordinate>,
    in_bounds: bool,
    routing: RoutingState,
    assets: AssetSelection,
}

impl Default for RequestComposer {
    fn default() -> Self {
        Self::new(RoutingEngine::default())
    }
}

impl RequestComposer {
    pub fn new(engine: RoutingEngine) -> Self {
        Self {
            engine,
            service: None,
            address: None,
            description: None,
            location: None,
            in_bounds: true,
            routing: RoutingState::Unevaluated,
            assets: AssetSelection::default(),
        }
    }

    /// Switches the service category. Blocked state, verdict and asset of the
    /// previous category are always discarded before the new service is
    /// evaluated.
    pub fn select_service(&mut self, service: ServiceDefinition) {
        self.reset_service_state();
        self.routing = self.engine.evaluate(&service, self.address.as_deref());
        self.service = Some(service);
    }

    pub fn clear_service(&mut self) {
        self.reset_service_state();
        self.service = None;
    }

    fn reset_service_state(&mut self) {
        self.routing = RoutingState::Unevaluated;
        self.assets.clear();
    }

    pub fn set_address<S: Into<String>>(&mut self, address: S) {
        let address = address.into();
        if address.trim().is_empty() {
            self.clear_address();
            return;
        }
        self.address = Some(address);
        self.reevaluate_road();
    }

    pub fn clear_address(&mut self) {
        self.address = None;
        self.reevaluate_road();
    }

    /// Only road based verdicts depend on the address.
    fn reevaluate_road(&mut self) {
        if let Some(service) = &self.service {
            if service.routing_mode() == RoutingMode::RoadBased {
                self.routing = self.engine.evaluate(service, self.address.as_deref());
            }
        }
    }

    pub fn set_description<S: Into<String>>(&mut self, description: S) {
        let description = description.into();
        self.description = if description.trim().is_empty() {
            None
        } else {
            Some(description)
        };
    }

    /// Records the picked location and returns whether it lies inside the
    /// jurisdiction.
    pub fn set_location(
        &mut self,
        session: &ReportingSession,
        point: Coordinate,
    ) -> bool {
        self.in_bounds = session.is_inside(&point);
        if !self.in_bounds {
            log::info!("location {:?} is outside the jurisdiction", point);
        }
        self.location = Some(point);
        self.in_bounds
    }

    /// Marks a feature the resident clicked. Only layers shown for the
    /// selected service can be used. Returns whether a feature was found.
    pub fn highlight_asset(
        &mut self,
        session: &ReportingSession,
        layer_id: &Id<MapLayer>,
        feature_index: usize,
    ) -> bool {
        let Some(service) = &self.service else {
            return false;
        };
        let layer = session.layer(layer_id).filter(|layer| {
            layer.visible_on_map && layer.applies_to(&service.service_code)
        });
        let feature = layer.and_then(|layer| {
            session
                .feature(layer_id, feature_index)
                .map(|feature| (layer, feature))
        });
        match feature {
            Some((layer, feature)) => {
                self.assets.highlight(layer, feature.clone());
                true
            }
            None => false,
        }
    }

    pub fn highlighted_asset(&self) -> Option<&HighlightedAsset> {
        self.assets.highlighted()
    }

    /// The explicit "select this asset" action.
    pub fn confirm_asset(&mut self) -> Option<&MatchedAsset> {
        self.assets.confirm()
    }

    pub fn dismiss_asset(&mut self) {
        self.assets.dismiss();
    }

    pub fn clear_asset(&mut self) {
        self.assets.clear();
    }

    pub fn selected_asset(&self) -> Option<&MatchedAsset> {
        self.assets.selected()
    }

    pub fn service(&self) -> Option<&ServiceDefinition> {
        self.service.as_ref()
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn location(&self) -> Option<Coordinate> {
        self.location
    }

    pub fn is_in_bounds(&self) -> bool {
        self.in_bounds
    }

    pub fn routing_state(&self) -> &RoutingState {
        &self.routing
    }

    pub fn routing_verdict(&self) -> RoutingVerdict {
        self.routing.verdict()
    }

    pub fn is_blocked(&self) -> bool {
        self.routing.is_blocked()
    }

    pub fn can_submit(&self) -> bool {
        self.check().is_ok()
    }

    fn check(&self) -> Result<(&ServiceDefinition, Coordinate), ComposeError> {
        let service = self.service.as_ref().ok_or(ComposeError::NoService)?;
        let location = self.location.ok_or(ComposeError::NoLocation)?;
        if !self.in_bounds {
            return Err(ComposeError::OutOfBounds);
        }
        if let RoutingState::Blocked(verdict) = &self.routing {
            return Err(ComposeError::Blocked(verdict.clone()));
        }
        Ok((service, location))
    }

    pub fn build_payload(&self) -> Result<ServiceRequestPayload, ComposeError> {
        let (service, location) = self.check()?;
        Ok(ServiceRequestPayload {
            service_code: service.service_code.clone(),
            lat: location.lat,
            long: location.lng,
            address_string: self.address.clone(),
            description: self.description.clone(),
            matched_asset: self.assets.selected().cloned(),
        })
    }
}
