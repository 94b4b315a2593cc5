//! Rule registry: `(entity, field) -> ordered rules` plus the metadata each
//! registration carries.
//!
//! The registry performs no validation itself. Its [`RuleDefinition`]s are the
//! unit of truth for documentation and for external tooling that turns rule
//! changes into reviewable artifacts.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::debug;

use plmgate_core::{Entity, EntityType, GuardError, GuardResult, Phase, Severity, When};

use crate::rule::Rule;

/// Literal example values for a rule.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RuleExamples {
    pub valid: Vec<JsonValue>,
    pub invalid: Vec<JsonValue>,
}

/// Metadata describing one registered rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDefinition {
    pub rule_name: String,
    pub entity: EntityType,
    pub field: String,
    pub severity: Severity,
    pub when: When,
    /// Missing values pass (taken from the entity schema).
    pub optional: bool,
    /// Fields read besides `field` (e.g. a trigger field).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_fields: Vec<String>,
    pub description: String,
    pub examples: RuleExamples,
}

/// A rule together with its registration metadata.
pub struct RegisteredRule<E: Entity> {
    definition: RuleDefinition,
    rule: Box<dyn Rule<E>>,
}

impl<E: Entity> core::fmt::Debug for RegisteredRule<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RegisteredRule")
            .field("definition", &self.definition)
            .finish_non_exhaustive()
    }
}

impl<E: Entity> RegisteredRule<E> {
    pub fn definition(&self) -> &RuleDefinition {
        &self.definition
    }

    pub fn rule(&self) -> &dyn Rule<E> {
        self.rule.as_ref()
    }

    pub fn name(&self) -> &str {
        &self.definition.rule_name
    }

    pub fn field(&self) -> &str {
        &self.definition.field
    }

    pub fn severity(&self) -> Severity {
        self.definition.severity
    }

    pub fn when(&self) -> When {
        self.definition.when
    }

    pub fn describe(&mut self, description: impl Into<String>) -> &mut Self {
        self.definition.description = description.into();
        self
    }

    pub fn examples<V, I>(&mut self, valid: V, invalid: I) -> &mut Self
    where
        V: IntoIterator,
        V::Item: Into<JsonValue>,
        I: IntoIterator,
        I::Item: Into<JsonValue>,
    {
        self.definition.examples = RuleExamples {
            valid: valid.into_iter().map(Into::into).collect(),
            invalid: invalid.into_iter().map(Into::into).collect(),
        };
        self
    }
}

/// All rules registered for one entity type, in declaration order.
pub struct RuleRegistry<E: Entity> {
    entries: Vec<RegisteredRule<E>>,
}

impl<E: Entity> Default for RuleRegistry<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<E: Entity> core::fmt::Debug for RuleRegistry<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("entity", &E::TYPE)
            .field("entries", &self.entries)
            .finish()
    }
}

impl<E: Entity> RuleRegistry<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `rule` with the severity its evaluations run under.
    ///
    /// Rejects fields outside the entity schema (governed or related), rules
    /// declaring a required field optional, and duplicate rule names.
    pub fn register<R>(
        &mut self,
        severity: Severity,
        rule: R,
    ) -> GuardResult<&mut RegisteredRule<E>>
    where
        R: Rule<E> + 'static,
    {
        let Some(spec) = E::field_spec(rule.field()) else {
            return Err(GuardError::unknown_field(E::TYPE, rule.field()));
        };
        if let Some(unknown) = rule
            .related_fields()
            .into_iter()
            .find(|related| E::field_spec(related).is_none())
        {
            return Err(GuardError::unknown_field(E::TYPE, unknown));
        }
        if rule.optional() && !spec.optional {
            return Err(GuardError::required_field(E::TYPE, rule.name(), rule.field()));
        }
        if self.get(rule.name()).is_some() {
            return Err(GuardError::duplicate_rule(E::TYPE, rule.name()));
        }

        let definition = RuleDefinition {
            rule_name: rule.name().to_string(),
            entity: E::TYPE,
            field: rule.field().to_string(),
            severity,
            when: rule.when(),
            optional: spec.optional,
            related_fields: rule.related_fields().into_iter().map(str::to_string).collect(),
            description: String::new(),
            examples: RuleExamples::default(),
        };
        debug!(
            entity = %E::TYPE,
            rule = %definition.rule_name,
            field = %definition.field,
            severity = %severity,
            "rule registered"
        );

        self.entries.push(RegisteredRule {
            definition,
            rule: Box::new(rule),
        });
        let last = self.entries.len() - 1;
        Ok(&mut self.entries[last])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredRule<E>> {
        self.entries.iter()
    }

    pub fn get(&self, rule_name: &str) -> Option<&RegisteredRule<E>> {
        self.entries.iter().find(|e| e.name() == rule_name)
    }

    /// Rules governing `field`, in declaration order.
    pub fn rules_for<'s>(&'s self, field: &'s str) -> impl Iterator<Item = &'s RegisteredRule<E>> {
        self.entries.iter().filter(move |e| e.field() == field)
    }

    /// Rules whose `when` clause covers `phase`.
    pub fn applicable(&self, phase: Phase) -> impl Iterator<Item = &RegisteredRule<E>> {
        self.entries.iter().filter(move |e| e.when().applies_to(phase))
    }

    /// Governed fields, first-declared first, without duplicates.
    pub fn fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !fields.contains(&entry.field()) {
                fields.push(entry.field());
            }
        }
        fields
    }

    pub fn definitions(&self) -> Vec<RuleDefinition> {
        self.entries.iter().map(|e| e.definition.clone()).collect()
    }
}
