use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::serde::{lenient, lenient_string, null_as_default};

pub const DEFAULT_THIRD_PARTY_MESSAGE: &str =
    "This request is handled by another agency. Please use the contacts below.";

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum RoutingMode {
    /// The township handles every request.
    #[default]
    None,
    /// Every request goes to a third party.
    ThirdParty,
    /// The handler depends on the road of the reported address.
    RoadBased,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum DefaultHandler {
    #[default]
    Township,
    ThirdParty,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Contact {
    pub name: String,
    // admin exports sometimes store phone numbers as numbers
    #[serde(default, deserialize_with = "lenient_string::deserialize_option")]
    pub phone: Option<String>,
    pub url: Option<String>,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RoutingConfig {
    #[serde(default)]
    pub mode: RoutingMode,
    #[serde(default)]
    pub default_handler: DefaultHandler,
    /// Roads handed to a third party although the township is the default.
    #[serde(default, deserialize_with = "null_as_default")]
    pub exclusion_list: Vec<String>,
    /// The only roads the township handles when a third party is the default.
    #[serde(default, deserialize_with = "null_as_default")]
    pub inclusion_list: Vec<String>,
    pub message: Option<String>,
    /// Takes precedence over `message`.
    pub third_party_message: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contacts: Vec<Contact>,
    /// Takes precedence over `contacts` when not empty.
    #[serde(default, deserialize_with = "null_as_default")]
    pub third_party_contacts: Vec<Contact>,
}

impl RoutingConfig {
    pub fn message_or_default(&self) -> String {
        [&self.third_party_message, &self.message]
            .into_iter()
            .filter_map(|message| message.as_deref().map(str::trim))
            .find(|message| !message.is_empty())
            .unwrap_or(DEFAULT_THIRD_PARTY_MESSAGE)
            .to_owned()
    }

    pub fn contacts(&self) -> &[Contact] {
        if self.third_party_contacts.is_empty() {
            &self.contacts
        } else {
            &self.third_party_contacts
        }
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ServiceDefinition {
    pub service_code: String,
    pub service_name: String,
    pub description: Option<String>,
    pub group: Option<String>,
    /// Service level mode. Takes precedence over the mode of the routing
    /// config when both are present.
    #[serde(default, deserialize_with = "lenient::deserialize_option")]
    pub routing_mode: Option<RoutingMode>,
    /// A config that cannot be read is dropped, leaving the service
    /// unrouted.
    #[serde(default, deserialize_with = "lenient::deserialize_option")]
    pub routing_config: Option<RoutingConfig>,
}

impl ServiceDefinition {
    pub fn routing_mode(&self) -> RoutingMode {
        self.routing_mode
            .or_else(|| self.routing_config.as_ref().map(|config| config.mode))
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RoutingVerdict {
    pub blocked: bool,
    pub message: String,
    pub contacts: Vec<Contact>,
}

impl RoutingVerdict {
    pub fn allowed() -> Self {
        Self::default()
    }

    pub fn blocked_by(config: &RoutingConfig) -> Self {
        Self {
            blocked: true,
            message: config.message_or_default(),
            contacts: config.contacts().to_vec(),
        }
    }
}
