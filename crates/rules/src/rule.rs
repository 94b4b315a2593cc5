//! The rule contract.

use core::marker::PhantomData;

use thiserror::Error;

use plmgate_core::{Entity, Phase, When};

use crate::context::EvaluationContext;
use crate::kinds::PhaseRestricted;
use crate::outcome::Outcome;

/// A pure check of one field of an entity mutation.
///
/// Contract:
/// - **Total**: every well-formed context yields an outcome (including creation,
///   null fields and never-set fields). Inapplicability is `valid: true` with a
///   `reason`, not a separate state.
/// - **Isolated**: reads only the context; never other rules' outcomes or
///   external state, so rules may run in any order or in parallel.
/// - **Deterministic**: the same context always yields the same outcome,
///   message text included.
///
/// `Err` is reserved for engineering faults (input the rule was never meant to
/// see). The executor reports those separately from validation failures.
pub trait Rule<E: Entity>: Send + Sync {
    /// Stable rule name, unique per entity.
    fn name(&self) -> &str;

    /// The governed field.
    fn field(&self) -> &str;

    /// Phases this rule applies to.
    fn when(&self) -> When {
        When::Both
    }

    /// Whether a missing value for the field is automatically valid.
    ///
    /// Only schema-optional fields may be declared optional.
    fn optional(&self) -> bool {
        false
    }

    /// Other fields the rule reads besides [`field`](Self::field).
    fn related_fields(&self) -> Vec<&str> {
        Vec::new()
    }

    fn evaluate(&self, ctx: &EvaluationContext<'_, E>) -> Result<Outcome, RuleError>;
}

/// Raised by a rule implementation that cannot produce an outcome.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("unexpected input: {0}")]
    UnexpectedInput(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Closure-backed rule for shapes the generic kinds do not cover.
pub struct FnRule<E, F> {
    name: String,
    field: String,
    optional: bool,
    check: F,
    _entity: PhantomData<fn() -> E>,
}

impl<E, F> FnRule<E, F>
where
    E: Entity,
    F: Fn(&EvaluationContext<'_, E>) -> Result<Outcome, RuleError> + Send + Sync,
{
    pub fn new(name: impl Into<String>, field: impl Into<String>, check: F) -> Self {
        Self {
            name: name.into(),
            field: field.into(),
            optional: false,
            check,
            _entity: PhantomData,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn only_on(self, phase: Phase) -> PhaseRestricted<Self> {
        PhaseRestricted::new(self, phase)
    }
}

impl<E, F> Rule<E> for FnRule<E, F>
where
    E: Entity,
    F: Fn(&EvaluationContext<'_, E>) -> Result<Outcome, RuleError> + Send + Sync,
{
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
        (self.check)(ctx)
    }
}
