use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserializes `null` (or a missing field, together with `#[serde(default)]`)
/// into the default value of `T`. Configuration exported by admin tooling
/// frequently contains `null` for empty lists.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Renders a scalar JSON value as an identifier string. Strings are taken
/// as they are, numbers and booleans are formatted. Empty strings, `null`,
/// arrays and objects yield `None`.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub mod lenient_string {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Accepts a string, a number or `null` and produces an optional string.
    pub fn deserialize_option<'de, D>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(super::scalar_to_string))
    }
}

/// Optional values that are dropped instead of failing the surrounding
/// document when they do not fit `T`.
pub mod lenient {
    use serde::{de::DeserializeOwned, Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize_option<'de, D, T>(
        deserializer: D,
    ) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => return Ok(None),
            Some(value) => value,
        };
        match serde_json::from_value(value) {
            Ok(parsed) => Ok(Some(parsed)),
            Err(why) => {
                log::warn!("ignoring malformed value: {}", why);
                Ok(None)
            }
        }
    }
}
