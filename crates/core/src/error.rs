//! Error model for registration, context building and configuration.
//!
//! Validation failures are *not* errors: they are data carried by rule outcomes.
//! Everything in here is an engineering or wiring problem that an operator must see.

use thiserror::Error;

use crate::entity::EntityType;

/// Result type used across the guard layer.
pub type GuardResult<T> = Result<T, GuardError>;

/// Guard-level error.
///
/// Keep this focused on deterministic wiring failures (schema, identity, config).
/// Rule-level faults during evaluation live with the executor.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GuardError {
    /// A rule was registered against a field the entity schema does not declare.
    #[error("unknown field '{field}' for entity {entity}")]
    UnknownField { entity: EntityType, field: String },

    /// Two rules with the same name were registered for one entity.
    #[error("rule '{rule}' is already registered for entity {entity}")]
    DuplicateRule { entity: EntityType, rule: String },

    /// A rule declared a field optional that the entity schema requires.
    #[error("rule '{rule}' treats required field '{field}' of {entity} as optional")]
    RequiredField {
        entity: EntityType,
        rule: String,
        field: String,
    },

    /// The master record does not share the natural key of the proposed record.
    #[error("natural key mismatch for {entity}: proposed '{current}', master '{existing}'")]
    KeyMismatch {
        entity: EntityType,
        current: String,
        existing: String,
    },

    /// A natural-key code was malformed (e.g. blank).
    #[error("invalid code: {0}")]
    InvalidCode(String),

    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl GuardError {
    pub fn unknown_field(entity: EntityType, field: impl Into<String>) -> Self {
        Self::UnknownField {
            entity,
            field: field.into(),
        }
    }

    pub fn duplicate_rule(entity: EntityType, rule: impl Into<String>) -> Self {
        Self::DuplicateRule {
            entity,
            rule: rule.into(),
        }
    }

    pub fn required_field(
        entity: EntityType,
        rule: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Self::RequiredField {
            entity,
            rule: rule.into(),
            field: field.into(),
        }
    }

    pub fn key_mismatch(
        entity: EntityType,
        current: impl Into<String>,
        existing: impl Into<String>,
    ) -> Self {
        Self::KeyMismatch {
            entity,
            current: current.into(),
            existing: existing.into(),
        }
    }

    pub fn invalid_code(msg: impl Into<String>) -> Self {
        Self::InvalidCode(msg.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
