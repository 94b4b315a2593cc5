use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as JsonValue};

use plmgate_core::{FieldValue, Severity};

/// Result of one rule invocation.
///
/// A failed validation is an `Outcome` with `valid == false`, never an error.
/// The diagnostic `context` is populated on success too, so a pass is as
/// inspectable as a failure. Recurring keys: `reason`, `allowed_values`, and the
/// entity's natural-key field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    valid: bool,
    severity: Severity,
    rule_name: String,
    field_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    /// `None` on creation (no prior value exists). Omitted from JSON in that
    /// case, so a prior `null` stays distinguishable from "no prior record".
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_value"
    )]
    old_value: Option<FieldValue>,
    #[serde(default)]
    new_value: FieldValue,
    #[serde(default)]
    context: Map<String, JsonValue>,
}

/// A present `oldValue` key is always `Some`, even when its value is `null`.
fn present_value<'de, D>(deserializer: D) -> Result<Option<FieldValue>, D::Error>
where
    D: Deserializer<'de>,
{
    FieldValue::deserialize(deserializer).map(Some)
}

impl Outcome {
    pub fn valid(&self) -> bool {
        self.valid
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn rule_name(&self) -> &str {
        &self.rule_name
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn old_value(&self) -> Option<&FieldValue> {
        self.old_value.as_ref()
    }

    pub fn new_value(&self) -> &FieldValue {
        &self.new_value
    }

    pub fn context(&self) -> &Map<String, JsonValue> {
        &self.context
    }

    /// The `reason` entry of the diagnostic context, if any.
    pub fn reason(&self) -> Option<&str> {
        self.context.get("reason").and_then(JsonValue::as_str)
    }

    /// Invalid and HARD: blocks the mutation.
    pub fn is_violation(&self) -> bool {
        !self.valid && self.severity.blocks()
    }

    /// Invalid and SOFT: surfaced, never blocking.
    pub fn is_warning(&self) -> bool {
        !self.valid && !self.severity.blocks()
    }
}

/// Assembles an [`Outcome`]; finished with [`pass`](Self::pass) or [`fail`](Self::fail).
#[derive(Debug, Clone)]
pub struct OutcomeBuilder {
    severity: Severity,
    rule_name: String,
    field_name: String,
    old_value: Option<FieldValue>,
    new_value: FieldValue,
    context: Map<String, JsonValue>,
}

impl OutcomeBuilder {
    pub fn new(
        rule_name: impl Into<String>,
        field_name: impl Into<String>,
        severity: Severity,
        new_value: FieldValue,
    ) -> Self {
        Self {
            severity,
            rule_name: rule_name.into(),
            field_name: field_name.into(),
            old_value: None,
            new_value,
            context: Map::new(),
        }
    }

    pub fn old_value(mut self, old_value: Option<FieldValue>) -> Self {
        self.old_value = old_value;
        self
    }

    /// Add a diagnostic entry (later entries with the same key win).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    pub fn reason(self, reason: impl Into<String>) -> Self {
        self.with("reason", reason.into())
    }

    pub fn pass(self) -> Outcome {
        self.finish(true, None)
    }

    pub fn fail(self, message: impl Into<String>) -> Outcome {
        self.finish(false, Some(message.into()))
    }

    fn finish(self, valid: bool, message: Option<String>) -> Outcome {
        Outcome {
            valid,
            severity: self.severity,
            rule_name: self.rule_name,
            field_name: self.field_name,
            message,
            old_value: self.old_value,
            new_value: self.new_value,
            context: self.context,
        }
    }
}
