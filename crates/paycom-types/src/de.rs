//! Lenient field deserializers for gateway payloads.
//!
//! The gateway sends `null` for members it has nothing to say about, and is
//! loose about whether text members are strings or objects.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decodes `null` as the type's default, as a missing field would be.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn to_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Strings pass through; any other JSON is kept as its serialized text.
pub fn text_or_json<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(to_text(Value::deserialize(deserializer)?).unwrap_or_default())
}

pub fn optional_text_or_json<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(to_text(Value::deserialize(deserializer)?))
}
