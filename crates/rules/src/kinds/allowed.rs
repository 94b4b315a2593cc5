use plmgate_core::{Entity, Phase};

use crate::context::EvaluationContext;
use crate::kinds::{Comparison, PhaseRestricted};
use crate::outcome::Outcome;
use crate::rule::{Rule, RuleError};

/// The field's new value must be a member of a fixed allowed set.
///
/// A null or never-set value fails like any other disallowed value (its literal
/// form lands in the message) unless the entity schema marks the field
/// optional, in which case it passes before the membership check runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedValues {
    name: String,
    field: String,
    allowed: Vec<String>,
    comparison: Comparison,
    optional: bool,
}

impl AllowedValues {
    /// `allowed` keeps its declared order in messages and diagnostics.
    pub fn new(
        name: impl Into<String>,
        field: impl Into<String>,
        allowed: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            field: field.into(),
            allowed: allowed.into_iter().map(Into::into).collect(),
            comparison: Comparison::Exact,
            optional: false,
        }
    }

    pub fn comparison(mut self, comparison: Comparison) -> Self {
        self.comparison = comparison;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn only_on(self, phase: Phase) -> PhaseRestricted<Self> {
        PhaseRestricted::new(self, phase)
    }

    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }

    fn admits(&self, value: &str) -> bool {
        self.allowed
            .iter()
            .any(|allowed| self.comparison.matches(allowed, value))
    }
}

impl<E: Entity> Rule<E> for AllowedValues {
    fn name(&self) -> &str {
        &self.name
    }

    fn field(&self) -> &str {
        &self.field
    }

    fn optional(&self) -> bool {
        self.optional
    }

    fn evaluate(&self, ctx: &EvaluationContext<'_, E>) -> Result<Outcome, RuleError> {
        let field = self.field.as_str();
        let new_value = ctx.new_value(field);
        let outcome = ctx
            .outcome(&self.name, field)
            .with("allowed_values", self.allowed.clone())
            .with("provided_value", new_value.to_json());

        let optional = self.optional || E::field_spec(field).is_some_and(|spec| spec.optional);
        if optional && new_value.is_missing() {
            return Ok(outcome
                .reason(format!("{field} is optional and not provided."))
                .pass());
        }

        match new_value.as_str() {
            Some(value) if self.admits(value) => Ok(outcome
                .reason(format!("{field} is one of the allowed values."))
                .pass()),
            _ => Ok(outcome.fail(format!(
                "The '{field}' value '{new_value}' is not allowed. It must be one of: {}.",
                self.allowed.join(", ")
            ))),
        }
    }
}
