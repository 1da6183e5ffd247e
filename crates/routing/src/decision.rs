use std::{error, fmt};

use model::service::{
    DefaultHandler, RoutingConfig, RoutingMode, RoutingVerdict, ServiceDefinition,
};

use crate::road::RoadMatchSettings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingError {
    /// A road based service without a routing config to read the road lists
    /// from.
    MissingConfig { service_code: String },
}

impl error::Error for RoutingError {}

impl fmt::Display for RoutingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RoutingError::MissingConfig { service_code } => write!(
                f,
                "service {} is road based but has no routing config",
                service_code
            ),
        }
    }
}

/// Routing state of the currently selected service. Re-entered on every
/// service selection and address change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RoutingState {
    /// A road based service is waiting for an address.
    #[default]
    Unevaluated,
    Allowed,
    Blocked(RoutingVerdict),
}

impl RoutingState {
    pub fn is_blocked(&self) -> bool {
        matches!(self, RoutingState::Blocked(_))
    }

    pub fn verdict(&self) -> RoutingVerdict {
        match self {
            RoutingState::Blocked(verdict) => verdict.clone(),
            RoutingState::Unevaluated | RoutingState::Allowed => {
                RoutingVerdict::allowed()
            }
        }
    }
}

fn blocked(config: Option<&RoutingConfig>) -> RoutingState {
    let verdict = match config {
        Some(config) => RoutingVerdict::blocked_by(config),
        None => RoutingVerdict::blocked_by(&RoutingConfig::default()),
    };
    RoutingState::Blocked(verdict)
}

/// Decides who handles a request for `service` at `address`, without
/// applying any policy to errors.
pub fn decide(
    service: &ServiceDefinition,
    address: Option<&str>,
    settings: &RoadMatchSettings,
) -> Result<RoutingState, RoutingError> {
    let config = service.routing_config.as_ref();
    match service.routing_mode() {
        RoutingMode::None => Ok(RoutingState::Allowed),
        RoutingMode::ThirdParty => Ok(blocked(config)),
        RoutingMode::RoadBased => {
            let config = config.ok_or_else(|| RoutingError::MissingConfig {
                service_code: service.service_code.clone(),
            })?;
            let Some(address) = address.map(str::trim).filter(|a| !a.is_empty())
            else {
                return Ok(RoutingState::Unevaluated);
            };
            let is_blocked = match config.default_handler {
                // the road is carved out to a third party
                DefaultHandler::Township => {
                    settings.matches_any(address, &config.exclusion_list)
                }
                // the township only handles the listed roads
                DefaultHandler::ThirdParty => {
                    !settings.matches_any(address, &config.inclusion_list)
                }
            };
            if is_blocked {
                Ok(blocked(Some(config)))
            } else {
                Ok(RoutingState::Allowed)
            }
        }
    }
}

/// The fail-open policy: a routing decision that cannot be made lets the
/// request through.
pub fn fail_open(result: Result<RoutingState, RoutingError>) -> RoutingState {
    result.unwrap_or_else(|why| {
        log::warn!("routing decision failed, allowing request: {}", why);
        RoutingState::Allowed
    })
}

#[derive(Debug, Clone, Default)]
pub struct RoutingEngine {
    settings: RoadMatchSettings,
}

impl RoutingEngine {
    pub fn new(settings: RoadMatchSettings) -> Self {
        Self { settings }
    }

    pub fn evaluate(
        &self,
        service: &ServiceDefinition,
        address: Option<&str>,
    ) -> RoutingState {
        let state = fail_open(decide(service, address, &self.settings));
        log::debug!(
            "routing for {} at {:?}: {:?}",
            service.service_code,
            address,
            state
        );
        state
    }
}

#[cfg(test)]
mod tests {
    use model::service::{Contact, DEFAULT_THIRD_PARTY_MESSAGE};
    use serde_json::json;

    use super::*;

    fn service(routing: serde_json::Value) -> ServiceDefinition {
        serde_json::from_value(json!({
            "service_code": "road-repair",
            "service_name": "Road Repair",
            "routing_config": routing
        }))
        .unwrap()
    }

    fn engine() -> RoutingEngine {
        RoutingEngine::default()
    }

    #[test]
    fn township_default_blocks_excluded_roads() {
        let service = service(json!({
            "mode": "road_based",
            "default_handler": "township",
            "exclusion_list": ["County Route 1"],
            "third_party_message": "County Route 1 belongs to the county.",
            "third_party_contacts": [{ "name": "County DPW", "url": "https://county.example" }]
        }));
        let state = engine().evaluate(&service, Some("45 County Route 1"));
        assert_eq!(
            state,
            RoutingState::Blocked(RoutingVerdict {
                blocked: true,
                message: "County Route 1 belongs to the county.".to_owned(),
                contacts: vec![Contact {
                    name: "County DPW".to_owned(),
                    phone: None,
                    url: Some("https://county.example".to_owned()),
                }],
            })
        );
        assert_eq!(
            engine().evaluate(&service, Some("12 Elm St")),
            RoutingState::Allowed
        );
    }

    #[test]
    fn third_party_default_allows_only_included_roads() {
        let service = service(json!({
            "mode": "road_based",
            "default_handler": "third_party",
            "inclusion_list": ["Main St"]
        }));
        assert_eq!(
            engine().evaluate(&service, Some("1 Main St")),
            RoutingState::Allowed
        );
        let state = engine().evaluate(&service, Some("1 Side St"));
        assert!(state.is_blocked());
        assert_eq!(state.verdict().message, DEFAULT_THIRD_PARTY_MESSAGE);
    }

    #[test]
    fn road_based_waits_for_an_address() {
        let service = service(json!({ "mode": "road_based", "exclusion_list": ["Main St"] }));
        assert_eq!(engine().evaluate(&service, None), RoutingState::Unevaluated);
        assert_eq!(
            engine().evaluate(&service, Some("  ")),
            RoutingState::Unevaluated
        );
        assert!(!RoutingState::Unevaluated.is_blocked());
        assert_eq!(RoutingState::Unevaluated.verdict(), RoutingVerdict::allowed());
    }

    #[test]
    fn third_party_mode_blocks_without_address() {
        let service = service(json!({
            "mode": "third_party",
            "message": "Handled by the water authority."
        }));
        let state = engine().evaluate(&service, None);
        assert!(state.is_blocked());
        assert_eq!(state.verdict().message, "Handled by the water authority.");
    }

    #[test]
    fn no_mode_always_allows() {
        let service = service(json!(null));
        assert_eq!(
            engine().evaluate(&service, Some("45 County Route 1")),
            RoutingState::Allowed
        );
    }

    #[test]
    fn missing_config_fails_open() {
        let mut service = service(json!(null));
        service.routing_mode = Some(RoutingMode::RoadBased);
        assert_eq!(
            decide(&service, Some("1 Main St"), &RoadMatchSettings::default()),
            Err(RoutingError::MissingConfig {
                service_code: "road-repair".to_owned()
            })
        );
        assert_eq!(
            engine().evaluate(&service, Some("1 Main St")),
            RoutingState::Allowed
        );
    }

    #[test]
    fn third_party_service_mode_without_config_uses_generic_message() {
        let mut service = service(json!(null));
        service.routing_mode = Some(RoutingMode::ThirdParty);
        let verdict = engine().evaluate(&service, None).verdict();
        assert!(verdict.blocked);
        assert_eq!(verdict.message, DEFAULT_THIRD_PARTY_MESSAGE);
        assert!(verdict.contacts.is_empty());
    }
}
