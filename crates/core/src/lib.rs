//! `plmgate-core`: building blocks for catalog mutation guards.
//!
//! This crate contains **pure** primitives (no IO, no logging setup).

pub mod entity;
pub mod error;
pub mod id;
pub mod phase;
pub mod severity;
pub mod value;

pub use entity::{Entity, EntityType, FieldSpec, Record};
pub use error::{GuardError, GuardResult};
pub use id::{ProductCode, StyleCode};
pub use phase::{Phase, When};
pub use severity::Severity;
pub use value::FieldValue;
