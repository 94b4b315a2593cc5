//! Generic rule kinds, parameterised by field, allowed set, comparison and phase.
//!
//! Concrete business rules are instances of these kinds; none of them
//! re-implements the branch logic.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use plmgate_core::FieldValue;

pub mod allowed;
pub mod conditional;
pub mod immutable;
pub mod phase;

pub use allowed::AllowedValues;
pub use conditional::ImmutableWhenChanged;
pub use immutable::Immutable;
pub use phase::PhaseRestricted;

/// How two field values are compared.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Comparison {
    /// Byte-for-byte; `null` and never-set are distinct from each other and from text.
    #[default]
    Exact,
    /// Case-folded text.
    IgnoreCase,
    /// Surrounding whitespace ignored; `null` and never-set read as empty text.
    Trimmed,
}

impl Comparison {
    pub fn normalize<'s>(self, s: &'s str) -> Cow<'s, str> {
        match self {
            Comparison::Exact => Cow::Borrowed(s),
            Comparison::IgnoreCase => Cow::Owned(s.to_lowercase()),
            Comparison::Trimmed => Cow::Borrowed(s.trim()),
        }
    }

    pub fn matches(self, a: &str, b: &str) -> bool {
        self.normalize(a) == self.normalize(b)
    }

    pub fn values_equal(self, a: &FieldValue, b: &FieldValue) -> bool {
        match self {
            Comparison::Trimmed => {
                self.matches(a.as_str().unwrap_or(""), b.as_str().unwrap_or(""))
            }
            Comparison::Exact | Comparison::IgnoreCase => match (a.as_str(), b.as_str()) {
                (Some(a), Some(b)) => self.matches(a, b),
                _ => a == b,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_keeps_missing_states_distinct() {
        let cmp = Comparison::Exact;
        assert!(cmp.values_equal(&FieldValue::Null, &FieldValue::Null));
        assert!(!cmp.values_equal(&FieldValue::Null, &FieldValue::Undefined));
        assert!(!cmp.values_equal(&FieldValue::Null, &FieldValue::value("")));
        assert!(!cmp.values_equal(&FieldValue::value("a"), &FieldValue::value("A")));
    }

    #[test]
    fn trimmed_treats_missing_as_empty() {
        let cmp = Comparison::Trimmed;
        assert!(cmp.values_equal(&FieldValue::Null, &FieldValue::value("  ")));
        assert!(cmp.values_equal(&FieldValue::value(" Dress "), &FieldValue::value("Dress")));
        assert!(!cmp.values_equal(&FieldValue::value("Dress"), &FieldValue::value("dress")));
    }

    #[test]
    fn ignore_case_folds() {
        assert!(Comparison::IgnoreCase.matches("Black", "black"));
        assert!(!Comparison::IgnoreCase.matches("black ", "black"));
    }
}
