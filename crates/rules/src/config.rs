//! Executor configuration.
//!
//! Loaded from JSON or from `PLMGATE_*` environment variables; defaults run
//! every registered rule sequentially under its registered severity.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use plmgate_core::{GuardError, GuardResult, Severity};

pub const ENV_PARALLELISM: &str = "PLMGATE_PARALLELISM";
pub const ENV_SKIP_INAPPLICABLE: &str = "PLMGATE_SKIP_INAPPLICABLE";
pub const ENV_SEVERITY_OVERRIDES: &str = "PLMGATE_SEVERITY_OVERRIDES";

/// How rule invocations for one mutation are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExecutionMode {
    #[default]
    Sequential,
    /// Scoped worker threads, at most `max_threads` per mutation.
    Parallel { max_threads: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub mode: ExecutionMode,
    /// Do not invoke rules whose `when` clause excludes the mutation's phase.
    pub skip_inapplicable: bool,
    /// Per-rule severity replacing the registered one.
    pub severity_overrides: BTreeMap<String, Severity>,
}

impl ValidationConfig {
    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn parallel(self, max_threads: usize) -> Self {
        self.with_mode(ExecutionMode::Parallel { max_threads })
    }

    pub fn with_skip_inapplicable(mut self, skip: bool) -> Self {
        self.skip_inapplicable = skip;
        self
    }

    pub fn with_severity_override(
        mut self,
        rule_name: impl Into<String>,
        severity: Severity,
    ) -> Self {
        self.severity_overrides.insert(rule_name.into(), severity);
        self
    }

    /// Severity a rule's evaluations run under.
    pub fn severity_for(&self, rule_name: &str, registered: Severity) -> Severity {
        self.severity_overrides
            .get(rule_name)
            .copied()
            .unwrap_or(registered)
    }

    pub fn from_json_str(json: &str) -> GuardResult<Self> {
        serde_json::from_str(json).map_err(|e| GuardError::invalid_config(e.to_string()))
    }

    /// Load from the process environment.
    pub fn from_env() -> GuardResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup (unset keys keep their defaults).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> GuardResult<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_PARALLELISM) {
            let threads: usize = raw.trim().parse().map_err(|_| {
                GuardError::invalid_config(format!(
                    "{ENV_PARALLELISM}: expected a thread count, got '{raw}'"
                ))
            })?;
            config.mode = if threads > 1 {
                ExecutionMode::Parallel { max_threads: threads }
            } else {
                ExecutionMode::Sequential
            };
        }

        if let Some(raw) = lookup(ENV_SKIP_INAPPLICABLE) {
            config.skip_inapplicable = raw.trim().parse().map_err(|_| {
                GuardError::invalid_config(format!(
                    "{ENV_SKIP_INAPPLICABLE}: expected true/false, got '{raw}'"
                ))
            })?;
        }

        if let Some(raw) = lookup(ENV_SEVERITY_OVERRIDES) {
            config.severity_overrides = parse_overrides(&raw)?;
        }

        Ok(config)
    }
}

/// Parse `RuleName=SOFT,Other=HARD`.
fn parse_overrides(raw: &str) -> GuardResult<BTreeMap<String, Severity>> {
    let mut overrides = BTreeMap::new();
    for pair in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (rule, severity) = pair.split_once('=').ok_or_else(|| {
            GuardError::invalid_config(format!(
                "{ENV_SEVERITY_OVERRIDES}: expected Rule=SEVERITY, got '{pair}'"
            ))
        })?;
        let rule = rule.trim();
        if rule.is_empty() {
            return Err(GuardError::invalid_config(format!(
                "{ENV_SEVERITY_OVERRIDES}: missing rule name in '{pair}'"
            )));
        }
        overrides.insert(rule.to_string(), severity.parse()?);
    }
    Ok(overrides)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_are_sequential_with_no_overrides() {
        let config = ValidationConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ValidationConfig::default());
        assert_eq!(config.mode, ExecutionMode::Sequential);
        assert_eq!(config.severity_for("Anything", Severity::Hard), Severity::Hard);
    }

    #[test]
    fn env_values_are_parsed() {
        let config = ValidationConfig::from_lookup(lookup(&[
            (ENV_PARALLELISM, "4"),
            (ENV_SKIP_INAPPLICABLE, "true"),
            (ENV_SEVERITY_OVERRIDES, "GenderAllowedValues=soft, SalesColorCodeAllowedValues=HARD"),
        ]))
        .unwrap();

        assert_eq!(config.mode, ExecutionMode::Parallel { max_threads: 4 });
        assert!(config.skip_inapplicable);
        assert_eq!(config.severity_for("GenderAllowedValues", Severity::Hard), Severity::Soft);
        assert_eq!(
            config.severity_for("SalesColorCodeAllowedValues", Severity::Soft),
            Severity::Hard
        );
    }

    #[test]
    fn single_thread_means_sequential() {
        let config = ValidationConfig::from_lookup(lookup(&[(ENV_PARALLELISM, "1")])).unwrap();
        assert_eq!(config.mode, ExecutionMode::Sequential);
    }

    #[test]
    fn malformed_values_are_config_errors() {
        for vars in [
            [(ENV_PARALLELISM, "many")],
            [(ENV_SKIP_INAPPLICABLE, "yes")],
            [(ENV_SEVERITY_OVERRIDES, "GenderAllowedValues")],
            [(ENV_SEVERITY_OVERRIDES, "GenderAllowedValues=MEDIUM")],
            [(ENV_SEVERITY_OVERRIDES, "=SOFT")],
        ] {
            let err = ValidationConfig::from_lookup(lookup(&vars)).unwrap_err();
            assert!(matches!(err, GuardError::InvalidConfig(_)), "{vars:?}");
        }
    }

    #[test]
    fn json_config_round_trips_through_serde() {
        let config = ValidationConfig::from_json_str(
            r#"{
                "mode": {"kind": "parallel", "max_threads": 2},
                "severity_overrides": {"GenderAllowedValues": "SOFT"}
            }"#,
        )
        .unwrap();

        assert_eq!(config.mode, ExecutionMode::Parallel { max_threads: 2 });
        assert!(!config.skip_inapplicable);
        assert_eq!(config.severity_overrides["GenderAllowedValues"], Severity::Soft);
        assert!(ValidationConfig::from_json_str("{\"mode\":42}").is_err());
    }
}
