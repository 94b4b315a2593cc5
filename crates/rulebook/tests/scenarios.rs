//! End-to-end mutations through the full rulebook.

use anyhow::{Context, Result};

use plmgate_catalog::{MasterProduct, MasterStyle, ProductRequest, StyleRequest};
use plmgate_core::{FieldValue, Phase, ProductCode, Severity, StyleCode};
use plmgate_rulebook::product::{PRODUCT_SEASON_CODE_IMMUTABLE, SALES_COLOR_CODE_ALLOWED_VALUES};
use plmgate_rulebook::style::{
    GENDER_ALLOWED_VALUES, PRODUCT_TYPE_MUST_BE_TEST_OR_DUMB, SIZE_RANGE_ALLOWED_VALUES,
    SIZE_RANGE_FOOTWEAR_OR_APPAREL_MEDIUM_ALLOWED_VALUES, SIZE_RANGE_S_M_OR_L_ALLOWED_VALUES,
    STYLE_NAME_IMMUTABLE_ACROSS_SEASONS, STYLE_NAME_IMMUTABLE_AFTER_CREATION,
};
use plmgate_rulebook::{Rulebook, RulebookError};
use plmgate_rules::{Outcome, ValidationConfig};

fn rulebook() -> Result<Rulebook> {
    plmgate_observability::init_for_tests();
    Ok(Rulebook::new()?)
}

fn style() -> StyleRequest {
    StyleRequest {
        style_code: StyleCode::new("ST001").unwrap(),
        name: "Summer Dress".to_string(),
        category: "Dresses".to_string(),
        gender: "W".to_string(),
        size_range: "s".to_string(),
        vertical: "Fashion".to_string(),
        season_code: "SS24".to_string(),
        origin_country: FieldValue::value("PT"),
        product_type: FieldValue::Undefined,
    }
}

fn product() -> ProductRequest {
    ProductRequest {
        code: ProductCode::new("P-001").unwrap(),
        style_code: StyleCode::new("ST001").unwrap(),
        sales_color_code: "red".to_string(),
        sales_color_name: "Red".to_string(),
        sales_availability: "available".to_string(),
        season_code: "FW24".to_string(),
        drop_out_date: FieldValue::Undefined,
        original_launch_date: FieldValue::value("2024-09-01"),
    }
}

fn outcome<'v>(verdict: &'v plmgate_rules::AggregatedVerdict, rule: &str) -> Result<&'v Outcome> {
    verdict
        .outcome(rule)
        .with_context(|| format!("no outcome for {rule}"))
}

#[test]
fn product_season_change_is_rejected() -> Result<()> {
    let rulebook = rulebook()?;
    let existing = MasterProduct::snapshot(&product(), "active");
    let mut current = product();
    current.season_code = "SS25".to_string();

    let verdict = rulebook.evaluate_product(&current, Some(&existing))?;
    let season = outcome(&verdict, PRODUCT_SEASON_CODE_IMMUTABLE)?;

    assert!(!season.valid());
    assert_eq!(season.severity(), Severity::Hard);
    assert_eq!(season.old_value(), Some(&FieldValue::value("FW24")));
    assert_eq!(season.new_value(), &FieldValue::value("SS25"));
    assert!(!verdict.accepted());
    assert_eq!(verdict.phase(), Phase::Update);
    Ok(())
}

#[test]
fn product_creation_with_allowed_color_is_accepted() -> Result<()> {
    let rulebook = rulebook()?;

    let verdict = rulebook.evaluate_product(&product(), None)?;
    let color = outcome(&verdict, SALES_COLOR_CODE_ALLOWED_VALUES)?;

    assert!(color.valid());
    assert_eq!(color.old_value(), None);
    assert_eq!(color.context()["code"], "P-001");
    assert!(verdict.accepted());
    assert_eq!(verdict.phase(), Phase::Creation);
    Ok(())
}

#[test]
fn style_renamed_across_seasons_is_flagged() -> Result<()> {
    let rulebook = rulebook()?;
    let existing = MasterStyle::snapshot(&style(), "active");
    let mut current = style();
    current.name = "Summer Dress II".to_string();
    current.season_code = "SS25".to_string();
    current.size_range = "S".to_string();

    let verdict = rulebook.evaluate_style(&current, Some(&existing))?;
    let across = outcome(&verdict, STYLE_NAME_IMMUTABLE_ACROSS_SEASONS)?;

    assert!(!across.valid());
    assert_eq!(across.severity(), Severity::Soft);
    let reason = across.reason().context("reason")?;
    for part in ["Summer Dress", "Summer Dress II", "SS24", "SS25"] {
        assert!(reason.contains(part), "{reason}");
    }

    // The HARD rename rule blocks; the SOFT one is surfaced as a warning.
    assert!(!outcome(&verdict, STYLE_NAME_IMMUTABLE_AFTER_CREATION)?.valid());
    assert!(!verdict.accepted());
    let warnings: Vec<&str> = verdict.warnings().map(Outcome::rule_name).collect();
    assert_eq!(warnings, [STYLE_NAME_IMMUTABLE_ACROSS_SEASONS]);
    Ok(())
}

#[test]
fn creation_only_size_range_rejects_other_sizes() -> Result<()> {
    let rulebook = rulebook()?;
    let mut current = style();
    current.size_range = "S".to_string();

    let verdict = rulebook.evaluate_style(&current, None)?;
    let sizes = outcome(&verdict, SIZE_RANGE_FOOTWEAR_OR_APPAREL_MEDIUM_ALLOWED_VALUES)?;

    assert!(!sizes.valid());
    assert_eq!(
        sizes.message(),
        Some("The 'size_range' value 'S' is not allowed. It must be one of: FTW-W, APP-M.")
    );
    assert!(!verdict.accepted());
    Ok(())
}

#[test]
fn unchanged_size_range_on_update_is_valid() -> Result<()> {
    let rulebook = rulebook()?;
    let existing = MasterStyle::snapshot(&style(), "active");
    let current = style();

    let verdict = rulebook.evaluate_style(&current, Some(&existing))?;
    let sizes = outcome(&verdict, SIZE_RANGE_ALLOWED_VALUES)?;

    assert!(sizes.valid());
    assert_eq!(sizes.old_value(), Some(&FieldValue::value("s")));
    assert_eq!(sizes.new_value(), &FieldValue::value("s"));
    // "s" is outside {S, M, L}, which only applies on update.
    assert!(!outcome(&verdict, SIZE_RANGE_S_M_OR_L_ALLOWED_VALUES)?.valid());
    Ok(())
}

#[test]
fn creation_runs_every_rule_and_skips_update_only_ones() -> Result<()> {
    let rulebook = rulebook()?;
    let mut current = style();
    current.size_range = "FTW-W".to_string();
    current.gender = "X".to_string();

    let verdict = rulebook.evaluate_style(&current, None)?;

    assert_eq!(verdict.len(), rulebook.styles().len());
    for rule in [
        GENDER_ALLOWED_VALUES,
        SIZE_RANGE_S_M_OR_L_ALLOWED_VALUES,
        STYLE_NAME_IMMUTABLE_AFTER_CREATION,
        STYLE_NAME_IMMUTABLE_ACROSS_SEASONS,
        PRODUCT_TYPE_MUST_BE_TEST_OR_DUMB,
    ] {
        assert!(outcome(&verdict, rule)?.valid(), "{rule}");
    }
    // FTW-W satisfies the creation-only set but not {s, m}.
    let violations: Vec<&str> = verdict.violations().map(Outcome::rule_name).collect();
    assert_eq!(violations, [SIZE_RANGE_ALLOWED_VALUES]);
    Ok(())
}

#[test]
fn optional_product_type_passes_null_and_rejects_invalid() -> Result<()> {
    let rulebook = rulebook()?;
    let mut current = style();
    current.size_range = "FTW-W".to_string();

    current.product_type = FieldValue::Null;
    let verdict = rulebook.evaluate_style(&current, None)?;
    assert!(outcome(&verdict, PRODUCT_TYPE_MUST_BE_TEST_OR_DUMB)?.valid());

    current.product_type = FieldValue::value("invalid");
    let verdict = rulebook.evaluate_style(&current, None)?;
    let product_type = outcome(&verdict, PRODUCT_TYPE_MUST_BE_TEST_OR_DUMB)?;
    assert!(!product_type.valid());
    assert_eq!(
        product_type.message(),
        Some("The 'product_type' value 'invalid' is not allowed. It must be one of: test, dumb.")
    );
    Ok(())
}

#[test]
fn master_extension_data_feeds_optional_fields() -> Result<()> {
    let rulebook = rulebook()?;
    let mut seeded = style();
    seeded.product_type = FieldValue::value("test");
    seeded.size_range = "S".to_string();
    let existing = MasterStyle::snapshot(&seeded, "active");

    let mut current = seeded.clone();
    current.size_range = "s".to_string();
    current.product_type = FieldValue::value("dumb");

    let verdict = rulebook.evaluate_style(&current, Some(&existing))?;
    let product_type = outcome(&verdict, PRODUCT_TYPE_MUST_BE_TEST_OR_DUMB)?;

    assert!(product_type.valid());
    assert_eq!(product_type.old_value(), Some(&FieldValue::value("test")));
    Ok(())
}

#[test]
fn soft_only_failures_are_accepted_with_warnings() -> Result<()> {
    let rulebook = rulebook()?;
    let mut current = product();
    current.sales_color_code = "blue".to_string();

    let verdict = rulebook.evaluate_product(&current, None)?;

    assert!(verdict.accepted());
    let warning = verdict.warnings().next().context("expected a warning")?;
    assert_eq!(warning.rule_name(), SALES_COLOR_CODE_ALLOWED_VALUES);
    assert_eq!(
        warning.message(),
        Some("The 'sales_color_code' value 'blue' is not allowed. It must be one of: black, red.")
    );
    Ok(())
}

#[test]
fn severity_override_downgrades_a_blocking_rule() -> Result<()> {
    plmgate_observability::init_for_tests();
    let config = ValidationConfig::default()
        .with_severity_override(PRODUCT_SEASON_CODE_IMMUTABLE, Severity::Soft)
        .parallel(2);
    let rulebook = Rulebook::with_config(config)?;
    let existing = MasterProduct::snapshot(&product(), "active");
    let mut current = product();
    current.season_code = "SS25".to_string();

    let verdict = rulebook.evaluate_product(&current, Some(&existing))?;

    assert!(verdict.accepted());
    assert_eq!(verdict.warnings().count(), 1);
    Ok(())
}

#[test]
fn mismatched_master_is_rejected_before_any_rule_runs() -> Result<()> {
    let rulebook = rulebook()?;
    let mut other = product();
    other.code = ProductCode::new("P-002")?;
    let existing = MasterProduct::snapshot(&other, "active");

    let err = rulebook
        .evaluate_product(&product(), Some(&existing))
        .expect_err("key mismatch");
    assert!(matches!(err, RulebookError::Guard(_)));
    assert!(err.to_string().contains("P-002"));
    Ok(())
}

#[test]
fn verdict_serializes_for_consumers() -> Result<()> {
    let rulebook = rulebook()?;
    let existing = MasterProduct::snapshot(&product(), "active");
    let mut current = product();
    current.season_code = "SS25".to_string();

    let verdict = rulebook.evaluate_product(&current, Some(&existing))?;
    let json = serde_json::to_value(&verdict)?;

    assert_eq!(json["accepted"], false);
    assert_eq!(json["naturalKey"], "P-001");
    let season = &json["fields"]["season_code"][0];
    assert_eq!(season["ruleName"], PRODUCT_SEASON_CODE_IMMUTABLE);
    assert_eq!(season["oldValue"], "FW24");
    assert_eq!(season["newValue"], "SS25");
    Ok(())
}
