use plmgate_core::{Entity, Phase, Record, When};

use crate::context::{EvaluationContext, Transition};
use crate::kinds::{Comparison, PhaseRestricted};
use crate::outcome::Outcome;
use crate::rule::{Rule, RuleError};

/// The field may not change in the same update that changes a trigger field.
///
/// Decision table on update (only the "both changed" cell fails):
///
/// | field changed | trigger changed | verdict |
/// |---|---|---|
/// | no  | no  | valid |
/// | yes | no  | valid |
/// | no  | yes | valid |
/// | yes | yes | invalid |
///
/// Every cell reports a distinct `reason`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImmutableWhenChanged {
    name: String,
    field: String,
    trigger: String,
    comparison: Comparison,
}

impl ImmutableWhenChanged {
    pub fn new(
        name: impl Into<String>,
        field: impl Into<String>,
        trigger: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            field: field.into(),
            trigger: trigger.into(),
            comparison: Comparison::Exact,
        }
    }

    pub fn comparison(mut self, comparison: Comparison) -> Self {
        self.comparison = comparison;
        self
    }

    pub fn only_on(self, phase: Phase) -> PhaseRestricted<Self> {
        PhaseRestricted::new(self, phase)
    }

    pub fn trigger(&self) -> &str {
        &self.trigger
    }
}

impl<E: Entity> Rule<E> for ImmutableWhenChanged {
    fn name(&self) -> &str {
        &self.name
    }

    fn field(&self) -> &str {
        &self.field
    }

    fn when(&self) -> When {
        When::Update
    }

    fn related_fields(&self) -> Vec<&str> {
        vec![self.trigger.as_str()]
    }

    fn evaluate(&self, ctx: &EvaluationContext<'_, E>) -> Result<Outcome, RuleError> {
        let field = self.field.as_str();
        let trigger = self.trigger.as_str();
        let outcome = ctx.outcome(&self.name, field);

        let existing = match ctx.transition() {
            Transition::Creation => {
                return Ok(outcome
                    .reason(format!(
                        "New {} creation - no historical comparison needed",
                        E::TYPE.noun()
                    ))
                    .pass());
            }
            Transition::Update { existing } => existing,
        };

        let old_value = existing.field(field);
        let new_value = ctx.new_value(field);
        let old_trigger = existing.field(trigger);
        let new_trigger = ctx.new_value(trigger);

        let field_changed = !self.comparison.values_equal(&old_value, &new_value);
        let trigger_changed = !self.comparison.values_equal(&old_trigger, &new_trigger);

        let outcome = outcome
            .with(format!("previous_{trigger}"), old_trigger.to_json())
            .with(format!("current_{trigger}"), new_trigger.to_json());

        match (field_changed, trigger_changed) {
            (true, true) => Ok(outcome
                .with(format!("previous_{field}"), old_value.to_json())
                .with(format!("current_{field}"), new_value.to_json())
                .reason(format!(
                    "{field} changed from \"{old_value}\" to \"{new_value}\" \
                     while {trigger} changed from {old_trigger} to {new_trigger}"
                ))
                .fail(format!(
                    "'{field}' cannot change when '{trigger}' changes. \
                     Previous: \"{old_value}\" ({old_trigger}), \
                     Current: \"{new_value}\" ({new_trigger})"
                ))),
            (true, false) => Ok(outcome
                .reason(format!("Same {trigger} - {field} change allowed"))
                .pass()),
            (false, true) => Ok(outcome
                .reason(format!("{field} unchanged across {trigger} change"))
                .pass()),
            (false, false) => Ok(outcome
                .reason(format!("{field} and {trigger} unchanged"))
                .pass()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{master_style, style};
    use plmgate_catalog::Style;
    use plmgate_core::{FieldValue, Severity};

    fn rule() -> ImmutableWhenChanged {
        ImmutableWhenChanged::new("StyleNameImmutableAcrossSeasons", "name", "season_code")
    }

    fn evaluate(name: &str, season: &str) -> Outcome {
        let mut current = style();
        current.name = name.to_string();
        current.season_code = season.to_string();
        let existing = master_style();
        let ctx =
            EvaluationContext::<Style>::new(&current, Some(&existing), Severity::Soft).unwrap();
        Rule::<Style>::evaluate(&rule(), &ctx).unwrap()
    }

    #[test]
    fn both_changed_is_invalid_and_names_both_sides() {
        let outcome = evaluate("New Summer Dress", "SS25");

        assert!(!outcome.valid());
        assert_eq!(outcome.severity(), Severity::Soft);
        assert_eq!(outcome.old_value(), Some(&FieldValue::value("Summer Dress")));
        assert_eq!(outcome.new_value(), &FieldValue::value("New Summer Dress"));
        assert_eq!(
            outcome.message(),
            Some(
                "'name' cannot change when 'season_code' changes. \
                 Previous: \"Summer Dress\" (SS24), Current: \"New Summer Dress\" (SS25)"
            )
        );
        let reason = outcome.reason().unwrap();
        for part in ["Summer Dress", "New Summer Dress", "SS24", "SS25"] {
            assert!(reason.contains(part), "reason should mention {part}: {reason}");
        }
    }

    #[test]
    fn each_valid_quadrant_has_a_distinct_reason() {
        let name_only = evaluate("Updated Summer Dress", "SS24");
        let season_only = evaluate("Summer Dress", "SS25");
        let neither = evaluate("Summer Dress", "SS24");

        for outcome in [&name_only, &season_only, &neither] {
            assert!(outcome.valid());
            assert_eq!(outcome.message(), None);
        }
        assert_eq!(name_only.reason(), Some("Same season_code - name change allowed"));
        assert_eq!(season_only.reason(), Some("name unchanged across season_code change"));
        assert_eq!(neither.reason(), Some("name and season_code unchanged"));
    }

    #[test]
    fn creation_needs_no_comparison() {
        let current = style();
        let ctx = EvaluationContext::<Style>::new(&current, None, Severity::Hard).unwrap();
        let outcome = Rule::<Style>::evaluate(&rule(), &ctx).unwrap();

        assert!(outcome.valid());
        assert_eq!(outcome.severity(), Severity::Hard);
        assert_eq!(
            outcome.reason(),
            Some("New style creation - no historical comparison needed")
        );
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: invalid iff both monitored fields changed.
            #[test]
            fn invalid_iff_both_changed(
                change_name in any::<bool>(),
                change_season in any::<bool>(),
            ) {
                let name = if change_name { "Renamed" } else { "Summer Dress" };
                let season = if change_season { "FW25" } else { "SS24" };
                let outcome = evaluate(name, season);
                prop_assert_eq!(outcome.valid(), !(change_name && change_season));
            }
        }
    }
}
