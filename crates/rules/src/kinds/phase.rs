use plmgate_core::{Entity, Phase, When};

use crate::context::EvaluationContext;
use crate::outcome::Outcome;
use crate::rule::{Rule, RuleError};

/// Restricts a rule to creation or to update.
///
/// The rule still runs in the other phase: it reports `valid: true` with a
/// reason and no message, so callers never need to pre-filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseRestricted<R> {
    inner: R,
    phase: Phase,
}

impl<R> PhaseRestricted<R> {
    pub fn new(inner: R, phase: Phase) -> Self {
        Self { inner, phase }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }
}

impl<E, R> Rule<E> for PhaseRestricted<R>
where
    E: Entity,
    R: Rule<E>,
{
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn field(&self) -> &str {
        self.inner.field()
    }

    fn when(&self) -> When {
        self.phase.into()
    }

    fn optional(&self) -> bool {
        self.inner.optional()
    }

    fn related_fields(&self) -> Vec<&str> {
        self.inner.related_fields()
    }

    fn evaluate(&self, ctx: &EvaluationContext<'_, E>) -> Result<Outcome, RuleError> {
        if ctx.phase() == self.phase {
            return self.inner.evaluate(ctx);
        }

        Ok(ctx
            .outcome(self.inner.name(), self.inner.field())
            .reason(format!(
                "Rule applies only to {} {}, skipping for {}.",
                E::TYPE.noun(),
                self.phase.noun(),
                ctx.phase().noun()
            ))
            .pass())
    }
}
