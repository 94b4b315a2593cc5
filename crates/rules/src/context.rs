//! Evaluation context: the proposed record, the optional master, and a severity.
//!
//! Absence of a master record is the only creation signal. It is modelled as a
//! tagged [`Transition`] so rules match on it instead of null-checking.

use plmgate_core::{Entity, FieldValue, GuardError, GuardResult, Phase, Record, Severity};

use crate::outcome::OutcomeBuilder;

/// Creation vs. update, carrying the master snapshot on update.
#[derive(Debug)]
pub enum Transition<'a, M> {
    Creation,
    Update { existing: &'a M },
}

impl<M> Clone for Transition<'_, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M> Copy for Transition<'_, M> {}

impl<'a, M> Transition<'a, M> {
    pub fn from_existing(existing: Option<&'a M>) -> Self {
        match existing {
            Some(existing) => Transition::Update { existing },
            None => Transition::Creation,
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            Transition::Creation => Phase::Creation,
            Transition::Update { .. } => Phase::Update,
        }
    }

    pub fn existing(&self) -> Option<&'a M> {
        match self {
            Transition::Creation => None,
            Transition::Update { existing } => Some(existing),
        }
    }
}

/// A validated entity mutation: proposed record + optional master of the same identity.
///
/// Built once per mutation attempt; every rule invocation derives its own
/// [`EvaluationContext`] from it with the rule's severity.
pub struct Mutation<'a, E: Entity> {
    current: &'a E::Request,
    transition: Transition<'a, E::Master>,
}

impl<E: Entity> Clone for Mutation<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: Entity> Copy for Mutation<'_, E> {}

impl<E: Entity> core::fmt::Debug for Mutation<'_, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Mutation")
            .field("entity", &E::TYPE)
            .field("current", self.current)
            .field("transition", &self.transition)
            .finish()
    }
}

impl<'a, E: Entity> Mutation<'a, E> {
    /// Combine a proposed record with the optional master record.
    ///
    /// Fails if the master does not share the proposed record's natural key.
    pub fn new(current: &'a E::Request, existing: Option<&'a E::Master>) -> GuardResult<Self> {
        if let Some(existing) = existing {
            if existing.natural_key() != current.natural_key() {
                return Err(GuardError::key_mismatch(
                    E::TYPE,
                    current.natural_key(),
                    existing.natural_key(),
                ));
            }
        }

        Ok(Self {
            current,
            transition: Transition::from_existing(existing),
        })
    }

    pub fn creation(current: &'a E::Request) -> Self {
        Self {
            current,
            transition: Transition::Creation,
        }
    }

    pub fn update(current: &'a E::Request, existing: &'a E::Master) -> GuardResult<Self> {
        Self::new(current, Some(existing))
    }

    pub fn current(&self) -> &'a E::Request {
        self.current
    }

    pub fn existing(&self) -> Option<&'a E::Master> {
        self.transition.existing()
    }

    pub fn transition(&self) -> Transition<'a, E::Master> {
        self.transition
    }

    pub fn phase(&self) -> Phase {
        self.transition.phase()
    }

    pub fn natural_key(&self) -> &'a str {
        self.current.natural_key()
    }

    /// Context for one rule invocation under `severity`.
    pub fn context(&self, severity: Severity) -> EvaluationContext<'a, E> {
        EvaluationContext {
            current: self.current,
            transition: self.transition,
            severity,
        }
    }
}

/// Immutable input to a single rule invocation.
pub struct EvaluationContext<'a, E: Entity> {
    current: &'a E::Request,
    transition: Transition<'a, E::Master>,
    severity: Severity,
}

impl<E: Entity> core::fmt::Debug for EvaluationContext<'_, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EvaluationContext")
            .field("entity", &E::TYPE)
            .field("current", self.current)
            .field("transition", &self.transition)
            .field("severity", &self.severity)
            .finish()
    }
}

impl<'a, E: Entity> EvaluationContext<'a, E> {
    /// Build a context directly (the executor goes through [`Mutation::context`]).
    pub fn new(
        current: &'a E::Request,
        existing: Option<&'a E::Master>,
        severity: Severity,
    ) -> GuardResult<Self> {
        Ok(Mutation::<E>::new(current, existing)?.context(severity))
    }

    pub fn current(&self) -> &'a E::Request {
        self.current
    }

    pub fn existing(&self) -> Option<&'a E::Master> {
        self.transition.existing()
    }

    pub fn transition(&self) -> Transition<'a, E::Master> {
        self.transition
    }

    pub fn phase(&self) -> Phase {
        self.transition.phase()
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn natural_key(&self) -> &'a str {
        self.current.natural_key()
    }

    /// The field's value in the proposed record.
    pub fn new_value(&self, field: &str) -> FieldValue {
        self.current.field(field)
    }

    /// The field's value in the master record; `None` on creation.
    pub fn old_value(&self, field: &str) -> Option<FieldValue> {
        self.existing().map(|existing| existing.field(field))
    }

    /// Start an outcome for `rule_name` on `field`.
    ///
    /// Pre-fills severity, old/new values and the natural key in the diagnostic context.
    pub fn outcome(&self, rule_name: &str, field: &str) -> OutcomeBuilder {
        OutcomeBuilder::new(rule_name, field, self.severity, self.new_value(field))
            .old_value(self.old_value(field))
            .with(E::NATURAL_KEY, self.natural_key())
    }
}
