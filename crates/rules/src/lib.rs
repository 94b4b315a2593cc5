//! Rule engine for catalog mutations.
//!
//! A [`Mutation`] pairs a proposed record with the optional master record.
//! Each rule in a [`RuleRegistry`] turns it into an [`Outcome`]; the
//! [`RuleExecutor`] runs all of them (never short-circuiting) and folds the
//! outcomes into an [`AggregatedVerdict`].

pub mod config;
pub mod context;
pub mod executor;
pub mod kinds;
pub mod outcome;
pub mod registry;
pub mod rule;
pub mod verdict;

pub use config::{ExecutionMode, ValidationConfig};
pub use context::{EvaluationContext, Mutation, Transition};
pub use executor::{EvaluationFault, FaultKind, RuleExecutor, RuleFault};
pub use kinds::{AllowedValues, Comparison, Immutable, ImmutableWhenChanged, PhaseRestricted};
pub use outcome::{Outcome, OutcomeBuilder};
pub use registry::{RegisteredRule, RuleDefinition, RuleExamples, RuleRegistry};
pub use rule::{FnRule, Rule, RuleError};
pub use verdict::AggregatedVerdict;
