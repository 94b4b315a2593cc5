//! Field values as seen by rules.
//!
//! A catalog field is either set to text, explicitly `null`, or was never set at
//! all. Rules must be able to tell the three apart, and messages must render the
//! missing forms literally (`null` / `undefined`).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;

/// Tri-state field value.
///
/// JSON mapping: a missing key is `Undefined` (use `#[serde(default)]` on the
/// containing field), `null` is `Null`, a string is `Value`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum FieldValue {
    #[default]
    Undefined,
    Null,
    Value(String),
}

impl FieldValue {
    pub fn value(s: impl Into<String>) -> Self {
        Self::Value(s.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Value(s) => Some(s),
            FieldValue::Null | FieldValue::Undefined => None,
        }
    }

    /// True for `Null` and `Undefined`.
    pub fn is_missing(&self) -> bool {
        !matches!(self, FieldValue::Value(_))
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, FieldValue::Undefined)
    }

    /// Read a value out of a free-form JSON extension map entry.
    ///
    /// Non-string scalars keep their JSON text so they stay comparable.
    pub fn from_json(value: Option<&JsonValue>) -> Self {
        match value {
            None => FieldValue::Undefined,
            Some(JsonValue::Null) => FieldValue::Null,
            Some(JsonValue::String(s)) => FieldValue::Value(s.clone()),
            Some(other) => FieldValue::Value(other.to_string()),
        }
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            FieldValue::Value(s) => JsonValue::String(s.clone()),
            FieldValue::Null | FieldValue::Undefined => JsonValue::Null,
        }
    }
}

impl core::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FieldValue::Value(s) => f.write_str(s),
            FieldValue::Null => f.write_str("null"),
            FieldValue::Undefined => f.write_str("undefined"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Value(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Value(value)
    }
}

impl From<Option<String>> for FieldValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(FieldValue::Null, FieldValue::Value)
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Value(s) => serializer.serialize_str(s),
            FieldValue::Null | FieldValue::Undefined => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Option::<String>::deserialize(deserializer)?.into())
    }
}
