//! Rule executor: runs every applicable rule for a mutation and aggregates.
//!
//! - No short-circuit: every rule runs, so one pass surfaces every violation.
//! - Validation failures are data (`Outcome { valid: false }`).
//! - A rule that errors, panics, or misattributes its outcome is a [`RuleFault`]:
//!   isolated per rule, and reported as an [`EvaluationFault`] instead of a verdict.

use std::panic::{AssertUnwindSafe, catch_unwind};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use plmgate_core::{Entity, EntityType, Severity};

use crate::config::{ExecutionMode, ValidationConfig};
use crate::context::Mutation;
use crate::outcome::Outcome;
use crate::registry::{RegisteredRule, RuleRegistry};
use crate::verdict::AggregatedVerdict;

/// Why a rule failed to produce a usable outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FaultKind {
    /// The rule returned `Err`.
    Errored(String),
    /// The rule panicked.
    Panicked(String),
    /// The outcome named another rule/field or another severity.
    Misattributed(String),
}

impl core::fmt::Display for FaultKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FaultKind::Errored(detail) => write!(f, "errored: {detail}"),
            FaultKind::Panicked(detail) => write!(f, "panicked: {detail}"),
            FaultKind::Misattributed(detail) => write!(f, "misattributed outcome: {detail}"),
        }
    }
}

/// An engineering fault in one rule (the rule is broken, not the data).
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("rule '{rule_name}' on field '{field_name}' {kind}")]
#[serde(rename_all = "camelCase")]
pub struct RuleFault {
    pub rule_name: String,
    pub field_name: String,
    pub kind: FaultKind,
}

impl RuleFault {
    fn new<E: Entity>(entry: &RegisteredRule<E>, kind: FaultKind) -> Self {
        Self {
            rule_name: entry.name().to_string(),
            field_name: entry.field().to_string(),
            kind,
        }
    }
}

/// Aggregation-level error: at least one rule faulted.
///
/// `partial` holds the outcomes of the rules that completed; it is for
/// operator diagnosis and must not be used to accept the mutation.
#[derive(Debug, Clone, Error)]
#[error("{count} rule fault(s) while evaluating {entity} '{natural_key}'", count = .faults.len())]
pub struct EvaluationFault {
    pub entity: EntityType,
    pub natural_key: String,
    pub faults: Vec<RuleFault>,
    pub partial: Box<AggregatedVerdict>,
}

struct Planned<'r, E: Entity> {
    index: usize,
    entry: &'r RegisteredRule<E>,
    severity: Severity,
}

type Invocation = (usize, Result<Outcome, RuleFault>);

/// Runs rule registries against entity mutations.
#[derive(Debug, Clone, Default)]
pub struct RuleExecutor {
    config: ValidationConfig,
}

impl RuleExecutor {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Evaluate every registered rule for the mutation.
    pub fn evaluate<E: Entity>(
        &self,
        registry: &RuleRegistry<E>,
        mutation: &Mutation<'_, E>,
    ) -> Result<AggregatedVerdict, EvaluationFault> {
        self.run(registry, mutation, |_| true)
    }

    /// Evaluate only the rules governing `fields`.
    pub fn evaluate_fields<E: Entity>(
        &self,
        registry: &RuleRegistry<E>,
        mutation: &Mutation<'_, E>,
        fields: &[&str],
    ) -> Result<AggregatedVerdict, EvaluationFault> {
        self.run(registry, mutation, |entry| {
            fields.iter().any(|field| *field == entry.field())
        })
    }

    fn run<E: Entity>(
        &self,
        registry: &RuleRegistry<E>,
        mutation: &Mutation<'_, E>,
        select: impl Fn(&RegisteredRule<E>) -> bool,
    ) -> Result<AggregatedVerdict, EvaluationFault> {
        let phase = mutation.phase();
        let plan: Vec<Planned<'_, E>> = registry
            .iter()
            .enumerate()
            .filter(|(_, entry)| select(entry))
            .filter(|(_, entry)| !self.config.skip_inapplicable || entry.when().applies_to(phase))
            .map(|(index, entry)| Planned {
                index,
                entry,
                severity: self.config.severity_for(entry.name(), entry.severity()),
            })
            .collect();

        debug!(
            entity = %E::TYPE,
            key = %mutation.natural_key(),
            phase = ?phase,
            rules = plan.len(),
            "evaluating mutation"
        );

        let mut invocations: Vec<Invocation> = match self.config.mode {
            ExecutionMode::Sequential => plan.iter().map(|p| invoke(p, mutation)).collect(),
            ExecutionMode::Parallel { max_threads } => run_parallel(&plan, mutation, max_threads),
        };
        // Arrival order is irrelevant: results follow registration order.
        invocations.sort_by_key(|(index, _)| *index);

        let mut outcomes = Vec::with_capacity(invocations.len());
        let mut faults = Vec::new();
        for (_, result) in invocations {
            match result {
                Ok(outcome) => outcomes.push(outcome),
                Err(fault) => faults.push(fault),
            }
        }

        let verdict =
            AggregatedVerdict::from_outcomes(E::TYPE, mutation.natural_key(), phase, outcomes);

        if !faults.is_empty() {
            for fault in &faults {
                error!(entity = %E::TYPE, key = %verdict.natural_key(), "{fault}");
            }
            return Err(EvaluationFault {
                entity: E::TYPE,
                natural_key: verdict.natural_key().to_string(),
                faults,
                partial: Box::new(verdict),
            });
        }

        for warning in verdict.warnings() {
            warn!(
                entity = %E::TYPE,
                key = %verdict.natural_key(),
                rule = %warning.rule_name(),
                detail = warning.message().unwrap_or_default(),
                "soft rule failed"
            );
        }
        info!(
            entity = %E::TYPE,
            key = %verdict.natural_key(),
            accepted = verdict.accepted(),
            violations = verdict.violations().count(),
            warnings = verdict.warnings().count(),
            "mutation evaluated"
        );

        Ok(verdict)
    }
}

fn run_parallel<E: Entity>(
    plan: &[Planned<'_, E>],
    mutation: &Mutation<'_, E>,
    max_threads: usize,
) -> Vec<Invocation> {
    if plan.is_empty() {
        return Vec::new();
    }
    let workers = max_threads.clamp(1, plan.len());
    let chunk_size = plan.len().div_ceil(workers);

    std::thread::scope(|scope| {
        let handles: Vec<_> = plan
            .chunks(chunk_size)
            .map(|chunk| {
                let handle = scope.spawn(move || {
                    chunk.iter().map(|p| invoke(p, mutation)).collect::<Vec<_>>()
                });
                (chunk, handle)
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|(chunk, handle)| {
                handle.join().unwrap_or_else(|_| {
                    chunk
                        .iter()
                        .map(|p| {
                            let kind = FaultKind::Panicked("worker thread terminated".to_string());
                            (p.index, Err(RuleFault::new(p.entry, kind)))
                        })
                        .collect()
                })
            })
            .collect()
    })
}

fn invoke<E: Entity>(planned: &Planned<'_, E>, mutation: &Mutation<'_, E>) -> Invocation {
    let entry = planned.entry;
    let ctx = mutation.context(planned.severity);

    let result = match catch_unwind(AssertUnwindSafe(|| entry.rule().evaluate(&ctx))) {
        Ok(Ok(outcome)) => check_attribution(entry, planned.severity, outcome),
        Ok(Err(err)) => Err(RuleFault::new(entry, FaultKind::Errored(err.to_string()))),
        Err(payload) => Err(RuleFault::new(
            entry,
            FaultKind::Panicked(panic_message(payload.as_ref())),
        )),
    };

    if let Ok(outcome) = &result {
        debug!(
            rule = %outcome.rule_name(),
            field = %outcome.field_name(),
            valid = outcome.valid(),
            severity = %outcome.severity(),
            "rule evaluated"
        );
    }

    (planned.index, result)
}

fn check_attribution<E: Entity>(
    entry: &RegisteredRule<E>,
    severity: Severity,
    outcome: Outcome,
) -> Result<Outcome, RuleFault> {
    if outcome.rule_name() != entry.name()
        || outcome.field_name() != entry.field()
        || outcome.severity() != severity
    {
        let detail = format!(
            "expected {}/{}/{}, got {}/{}/{}",
            entry.name(),
            entry.field(),
            severity,
            outcome.rule_name(),
            outcome.field_name(),
            outcome.severity()
        );
        return Err(RuleFault::new(entry, FaultKind::Misattributed(detail)));
    }
    Ok(outcome)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
