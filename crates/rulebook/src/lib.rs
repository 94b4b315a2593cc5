//! The catalog's business rules, expressed as instances of the generic rule kinds.
//!
//! Adding a rule is a registration here (name, field, allowed set or
//! comparison, phase, severity, description, examples); no branch logic is
//! re-implemented per field.

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use plmgate_catalog::{MasterProduct, MasterStyle, Product, ProductRequest, Style, StyleRequest};
use plmgate_core::{GuardError, GuardResult};
use plmgate_rules::{
    AggregatedVerdict, EvaluationFault, Mutation, RuleDefinition, RuleExecutor, RuleRegistry,
    ValidationConfig,
};

pub mod product;
pub mod style;

pub use product::product_rules;
pub use style::style_rules;

/// Why a mutation could not be judged.
#[derive(Debug, Error)]
pub enum RulebookError {
    /// Malformed input (e.g. a master record of another identity).
    #[error(transparent)]
    Guard(#[from] GuardError),

    /// At least one rule is broken; see the fault for which.
    #[error(transparent)]
    Fault(#[from] EvaluationFault),
}

/// One mutation as submitted from outside (e.g. a JSON document).
///
/// `existing` is omitted or `null` for a creation.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "entity", rename_all = "snake_case")]
pub enum MutationRequest {
    Style {
        current: StyleRequest,
        #[serde(default)]
        existing: Option<MasterStyle>,
    },
    Product {
        current: ProductRequest,
        #[serde(default)]
        existing: Option<MasterProduct>,
    },
}

/// Style and product registries plus the executor that runs them.
#[derive(Debug)]
pub struct Rulebook {
    styles: RuleRegistry<Style>,
    products: RuleRegistry<Product>,
    executor: RuleExecutor,
}

impl Rulebook {
    /// Rulebook with the default (sequential) executor.
    pub fn new() -> GuardResult<Self> {
        Self::with_config(ValidationConfig::default())
    }

    /// Rulebook configured from `PLMGATE_*` environment variables.
    pub fn from_env() -> GuardResult<Self> {
        Self::with_config(ValidationConfig::from_env()?)
    }

    /// Fails if a severity override names a rule neither registry knows.
    pub fn with_config(config: ValidationConfig) -> GuardResult<Self> {
        let styles = style_rules()?;
        let products = product_rules()?;

        let unknown = config
            .severity_overrides
            .keys()
            .find(|name| styles.get(name).is_none() && products.get(name).is_none());
        if let Some(rule_name) = unknown {
            return Err(GuardError::invalid_config(format!(
                "severity override names unknown rule '{rule_name}'"
            )));
        }

        info!(
            style_rules = styles.len(),
            product_rules = products.len(),
            mode = ?config.mode,
            "rulebook loaded"
        );
        Ok(Self {
            styles,
            products,
            executor: RuleExecutor::new(config),
        })
    }

    pub fn styles(&self) -> &RuleRegistry<Style> {
        &self.styles
    }

    pub fn products(&self) -> &RuleRegistry<Product> {
        &self.products
    }

    pub fn executor(&self) -> &RuleExecutor {
        &self.executor
    }

    /// Metadata for every rule (styles first), for documentation tooling.
    pub fn definitions(&self) -> Vec<RuleDefinition> {
        let mut definitions = self.styles.definitions();
        definitions.extend(self.products.definitions());
        definitions
    }

    /// Judge a mutation of either entity.
    pub fn evaluate(&self, request: &MutationRequest) -> Result<AggregatedVerdict, RulebookError> {
        match request {
            MutationRequest::Style { current, existing } => {
                self.evaluate_style(current, existing.as_ref())
            }
            MutationRequest::Product { current, existing } => {
                self.evaluate_product(current, existing.as_ref())
            }
        }
    }

    /// Judge a style mutation; `existing` is `None` for a creation.
    pub fn evaluate_style(
        &self,
        current: &StyleRequest,
        existing: Option<&MasterStyle>,
    ) -> Result<AggregatedVerdict, RulebookError> {
        let mutation = Mutation::<Style>::new(current, existing)?;
        Ok(self.executor.evaluate(&self.styles, &mutation)?)
    }

    /// Judge a product mutation; `existing` is `None` for a creation.
    pub fn evaluate_product(
        &self,
        current: &ProductRequest,
        existing: Option<&MasterProduct>,
    ) -> Result<AggregatedVerdict, RulebookError> {
        let mutation = Mutation::<Product>::new(current, existing)?;
        Ok(self.executor.evaluate(&self.products, &mutation)?)
    }
}
