//! Product rules.

use serde_json::json;

use plmgate_catalog::Product;
use plmgate_core::{GuardResult, Severity};
use plmgate_rules::{AllowedValues, Comparison, Immutable, RuleRegistry};

pub const PRODUCT_SEASON_CODE_IMMUTABLE: &str = "ProductSeasonCodeImmutable";
pub const SALES_COLOR_CODE_ALLOWED_VALUES: &str = "SalesColorCodeAllowedValues";

/// Every product rule, in evaluation order.
pub fn product_rules() -> GuardResult<RuleRegistry<Product>> {
    let mut rules = RuleRegistry::<Product>::new();

    rules
        .register(
            Severity::Hard,
            Immutable::new(PRODUCT_SEASON_CODE_IMMUTABLE, "season_code"),
        )?
        .describe("A product's season code is fixed once the product exists.")
        .examples(
            [json!({ "previous": "FW24", "current": "FW24" })],
            [json!({ "previous": "FW24", "current": "SS25" })],
        );

    rules
        .register(
            Severity::Soft,
            AllowedValues::new(SALES_COLOR_CODE_ALLOWED_VALUES, "sales_color_code", [
                "black", "red",
            ])
            .comparison(Comparison::IgnoreCase),
        )?
        .describe("Sales color code should be black or red (case-insensitive).")
        .examples(["black", "red", "RED"], ["blue", "", "white"]);

    Ok(rules)
}
