//! Aggregated verdict for one entity mutation.

use std::collections::BTreeMap;

use serde::Serialize;

use plmgate_core::{EntityType, Phase};

use crate::outcome::Outcome;

/// Outcomes grouped by field, plus the acceptance decision.
///
/// `accepted` is false iff some outcome is HARD and invalid. SOFT failures
/// never block but are surfaced through [`warnings`](Self::warnings).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedVerdict {
    entity: EntityType,
    natural_key: String,
    phase: Phase,
    accepted: bool,
    fields: BTreeMap<String, Vec<Outcome>>,
}

impl AggregatedVerdict {
    /// Group `outcomes` by field; within a field the given order is kept.
    pub fn from_outcomes(
        entity: EntityType,
        natural_key: impl Into<String>,
        phase: Phase,
        outcomes: impl IntoIterator<Item = Outcome>,
    ) -> Self {
        let mut fields: BTreeMap<String, Vec<Outcome>> = BTreeMap::new();
        for outcome in outcomes {
            fields
                .entry(outcome.field_name().to_string())
                .or_default()
                .push(outcome);
        }
        let accepted = !fields.values().flatten().any(Outcome::is_violation);

        Self {
            entity,
            natural_key: natural_key.into(),
            phase,
            accepted,
            fields,
        }
    }

    pub fn accepted(&self) -> bool {
        self.accepted
    }

    pub fn entity(&self) -> EntityType {
        self.entity
    }

    pub fn natural_key(&self) -> &str {
        &self.natural_key
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn fields(&self) -> &BTreeMap<String, Vec<Outcome>> {
        &self.fields
    }

    /// Outcomes of the rules governing `field` (empty if none ran).
    pub fn outcomes_for(&self, field: &str) -> &[Outcome] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn outcome(&self, rule_name: &str) -> Option<&Outcome> {
        self.outcomes().find(|o| o.rule_name() == rule_name)
    }

    pub fn outcomes(&self) -> impl Iterator<Item = &Outcome> {
        self.fields.values().flatten()
    }

    /// HARD failures (the reasons the mutation is rejected).
    pub fn violations(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes().filter(|o| o.is_violation())
    }

    /// SOFT failures (shown to the caller, never blocking).
    pub fn warnings(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes().filter(|o| o.is_warning())
    }

    pub fn len(&self) -> usize {
        self.fields.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
