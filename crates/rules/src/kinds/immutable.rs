use plmgate_core::{Entity, Phase, Record, When};

use crate::context::{EvaluationContext, Transition};
use crate::kinds::{Comparison, PhaseRestricted};
use crate::outcome::Outcome;
use crate::rule::{Rule, RuleError};

/// Once a master record exists the field must keep its value.
///
/// Creation always passes: the field is being set for the first time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Immutable {
    name: String,
    field: String,
    comparison: Comparison,
}

impl Immutable {
    pub fn new(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field: field.into(),
            comparison: Comparison::Exact,
        }
    }

    /// Compare ignoring surrounding whitespace (free-text fields).
    pub fn trimmed(mut self) -> Self {
        self.comparison = Comparison::Trimmed;
        self
    }

    pub fn comparison(mut self, comparison: Comparison) -> Self {
        self.comparison = comparison;
        self
    }

    pub fn only_on(self, phase: Phase) -> PhaseRestricted<Self> {
        PhaseRestricted::new(self, phase)
    }
}

impl<E: Entity> Rule<E> for Immutable {
    fn name(&self) -> &str {
        &self.name
    }

    fn field(&self) -> &str {
        &self.field
    }

    /// Creation is trivially valid, so only updates can fail.
    fn when(&self) -> When {
        When::Update
    }

    fn evaluate(&self, ctx: &EvaluationContext<'_, E>) -> Result<Outcome, RuleError> {
        let field = self.field.as_str();
        let noun = E::TYPE.noun();
        let outcome = ctx.outcome(&self.name, field);

        let existing = match ctx.transition() {
            Transition::Creation => {
                return Ok(outcome
                    .reason(format!(
                        "New {noun} creation - {field} is being set for the first time."
                    ))
                    .pass());
            }
            Transition::Update { existing } => existing,
        };

        let old_value = existing.field(field);
        let new_value = ctx.new_value(field);

        if self.comparison.values_equal(&old_value, &new_value) {
            let reason = match self.comparison {
                Comparison::Trimmed => {
                    format!("{field} remains unchanged (surrounding whitespace ignored).")
                }
                Comparison::Exact | Comparison::IgnoreCase => {
                    format!("{field} remains unchanged.")
                }
            };
            return Ok(outcome.reason(reason).pass());
        }

        Ok(outcome
            .with(format!("previous_{field}"), old_value.to_json())
            .with(format!("current_{field}"), new_value.to_json())
            .fail(format!(
                "The '{field}' for {noun} '{}' cannot be changed. \
                 It was originally '{old_value}' and is attempted to be changed to '{new_value}'.",
                ctx.natural_key()
            )))
    }
}
