//! Style rules.

use serde_json::{Value as JsonValue, json};

use plmgate_catalog::Style;
use plmgate_core::{GuardResult, Phase, Severity};
use plmgate_rules::{AllowedValues, Immutable, ImmutableWhenChanged, RuleRegistry};

pub const GENDER_ALLOWED_VALUES: &str = "GenderAllowedValues";
pub const SIZE_RANGE_ALLOWED_VALUES: &str = "SizeRangeAllowedValues";
pub const SIZE_RANGE_S_M_OR_L_ALLOWED_VALUES: &str = "SizeRangeSMorLAllowedValues";
pub const SIZE_RANGE_FOOTWEAR_OR_APPAREL_MEDIUM_ALLOWED_VALUES: &str =
    "SizeRangeFootwearOrApparelMediumAllowedValues";
pub const PRODUCT_TYPE_MUST_BE_TEST_OR_DUMB: &str = "ProductTypeMustBeTestOrDumb";
pub const STYLE_NAME_IMMUTABLE_AFTER_CREATION: &str = "StyleNameImmutableAfterCreation";
pub const STYLE_NAME_IMMUTABLE_ACROSS_SEASONS: &str = "StyleNameImmutableAcrossSeasons";

/// Every style rule, in evaluation order.
pub fn style_rules() -> GuardResult<RuleRegistry<Style>> {
    let mut rules = RuleRegistry::<Style>::new();

    rules
        .register(
            Severity::Hard,
            AllowedValues::new(GENDER_ALLOWED_VALUES, "gender", ["M", "W"]).only_on(Phase::Update),
        )?
        .describe("Gender must be 'M' or 'W' when a style is updated.")
        .examples(["M", "W"], ["F", "X", ""]);

    rules
        .register(
            Severity::Hard,
            AllowedValues::new(SIZE_RANGE_ALLOWED_VALUES, "size_range", ["s", "m"]),
        )?
        .describe("Size range must be 's' or 'm'.")
        .examples(["s", "m"], ["l", "S", "xl"]);

    rules
        .register(
            Severity::Hard,
            AllowedValues::new(SIZE_RANGE_S_M_OR_L_ALLOWED_VALUES, "size_range", ["S", "M", "L"])
                .only_on(Phase::Update),
        )?
        .describe("On update the size range must be one of S, M or L.")
        .examples(["S", "M", "L"], ["XL", "s", "XS"]);

    rules
        .register(
            Severity::Hard,
            AllowedValues::new(
                SIZE_RANGE_FOOTWEAR_OR_APPAREL_MEDIUM_ALLOWED_VALUES,
                "size_range",
                ["FTW-W", "APP-M"],
            )
            .only_on(Phase::Creation),
        )?
        .describe("A new style must use the FTW-W or APP-M size range.")
        .examples(["FTW-W", "APP-M"], ["S", "FTW-M", "app-m"]);

    rules
        .register(
            Severity::Hard,
            AllowedValues::new(PRODUCT_TYPE_MUST_BE_TEST_OR_DUMB, "product_type", ["test", "dumb"])
                .optional(),
        )?
        .describe("Product type is optional; when provided it must be 'test' or 'dumb'.")
        .examples(
            [json!("test"), json!("dumb"), JsonValue::Null],
            [json!("invalid"), json!("TEST"), json!("")],
        );

    rules
        .register(
            Severity::Hard,
            Immutable::new(STYLE_NAME_IMMUTABLE_AFTER_CREATION, "name").trimmed(),
        )?
        .describe(
            "A style's name cannot change after creation; surrounding whitespace is ignored.",
        )
        .examples(["Summer Dress", "  Summer Dress  "], ["Winter Dress", "Summer  Dress"]);

    rules
        .register(
            Severity::Soft,
            ImmutableWhenChanged::new(STYLE_NAME_IMMUTABLE_ACROSS_SEASONS, "name", "season_code"),
        )?
        .describe("A style's name should stay the same when it moves to a new season.")
        .examples(
            [
                json!({ "name": "Summer Dress", "season_code": "SS25" }),
                json!({ "name": "Summer Dress v2", "season_code": "SS24" }),
            ],
            [json!({ "name": "Summer Dress v2", "season_code": "SS25" })],
        );

    Ok(rules)
}
