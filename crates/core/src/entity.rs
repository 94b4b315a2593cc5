//! Entity traits: identity by natural key + a static field schema.

use serde::{Deserialize, Serialize};

use crate::value::FieldValue;

/// The kinds of catalog entities a mutation can target.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityType {
    Style,
    Product,
}

impl EntityType {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityType::Style => "Style",
            EntityType::Product => "Product",
        }
    }

    /// Lowercase noun used in human-readable messages ("style", "product").
    pub fn noun(self) -> &'static str {
        match self {
            EntityType::Style => "style",
            EntityType::Product => "product",
        }
    }
}

impl core::fmt::Display for EntityType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field of an entity schema.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    /// Whether the schema allows the field to be null or never set.
    pub optional: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str) -> Self {
        Self {
            name,
            optional: false,
        }
    }

    pub const fn optional(name: &'static str) -> Self {
        Self {
            name,
            optional: true,
        }
    }
}

/// A record whose fields can be read by name.
///
/// Lookups are total: a field the record does not carry reads as
/// [`FieldValue::Undefined`], never as an error.
pub trait Record: core::fmt::Debug + Send + Sync {
    /// The value of the entity's natural key (e.g. the style code).
    fn natural_key(&self) -> &str;

    /// Read a field by its schema name.
    fn field(&self, name: &str) -> FieldValue;
}

/// Entity marker + schema.
///
/// Pairs the proposed-state shape (`Request`) with the persisted master shape
/// (`Master`) of the same entity.
pub trait Entity: Send + Sync + 'static {
    type Request: Record;
    type Master: Record;

    const TYPE: EntityType;

    /// Name of the natural-key field shared by request and master.
    const NATURAL_KEY: &'static str;

    /// Fields that rules may govern.
    const FIELDS: &'static [FieldSpec];

    fn field_spec(name: &str) -> Option<&'static FieldSpec> {
        Self::FIELDS.iter().find(|f| f.name == name)
    }
}
