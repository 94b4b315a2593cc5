use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use plmgate_core::{Entity, EntityType, FieldSpec, FieldValue, ProductCode, Record, StyleCode};

/// Entity marker: Product (a sellable color/size variant of a style).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Product;

impl Entity for Product {
    type Request = ProductRequest;
    type Master = MasterProduct;

    const TYPE: EntityType = EntityType::Product;
    const NATURAL_KEY: &'static str = "code";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("code"),
        FieldSpec::required("style_code"),
        FieldSpec::required("sales_color_code"),
        FieldSpec::required("sales_color_name"),
        FieldSpec::required("sales_availability"),
        FieldSpec::required("season_code"),
        FieldSpec::optional("drop_out_date"),
        FieldSpec::optional("original_launch_date"),
    ];
}

/// Proposed state of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRequest {
    pub code: ProductCode,
    pub style_code: StyleCode,
    pub sales_color_code: String,
    pub sales_color_name: String,
    pub sales_availability: String,
    pub season_code: String,
    #[serde(default, skip_serializing_if = "FieldValue::is_undefined")]
    pub drop_out_date: FieldValue,
    #[serde(default, skip_serializing_if = "FieldValue::is_undefined")]
    pub original_launch_date: FieldValue,
}

impl Record for ProductRequest {
    fn natural_key(&self) -> &str {
        self.code.as_str()
    }

    fn field(&self, name: &str) -> FieldValue {
        match name {
            "code" => self.code.as_str().into(),
            "style_code" => self.style_code.as_str().into(),
            "sales_color_code" => self.sales_color_code.as_str().into(),
            "sales_color_name" => self.sales_color_name.as_str().into(),
            "sales_availability" => self.sales_availability.as_str().into(),
            "season_code" => self.season_code.as_str().into(),
            "drop_out_date" => self.drop_out_date.clone(),
            "original_launch_date" => self.original_launch_date.clone(),
            _ => FieldValue::Undefined,
        }
    }
}

/// Master snapshot of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterProduct {
    pub code: ProductCode,
    pub style_code: StyleCode,
    pub sales_color_code: String,
    pub sales_color_name: String,
    pub sales_availability: String,
    pub season_code: String,
    pub status: String,
    #[serde(default)]
    pub data: Map<String, JsonValue>,
}

impl MasterProduct {
    pub fn snapshot(request: &ProductRequest, status: impl Into<String>) -> Self {
        let mut data = Map::new();
        for (key, value) in [
            ("drop_out_date", &request.drop_out_date),
            ("original_launch_date", &request.original_launch_date),
        ] {
            if !value.is_undefined() {
                data.insert(key.to_string(), value.to_json());
            }
        }

        Self {
            code: request.code.clone(),
            style_code: request.style_code.clone(),
            sales_color_code: request.sales_color_code.clone(),
            sales_color_name: request.sales_color_name.clone(),
            sales_availability: request.sales_availability.clone(),
            season_code: request.season_code.clone(),
            status: status.into(),
            data,
        }
    }
}

impl Record for MasterProduct {
    fn natural_key(&self) -> &str {
        self.code.as_str()
    }

    fn field(&self, name: &str) -> FieldValue {
        match name {
            "code" => self.code.as_str().into(),
            "style_code" => self.style_code.as_str().into(),
            "sales_color_code" => self.sales_color_code.as_str().into(),
            "sales_color_name" => self.sales_color_name.as_str().into(),
            "sales_availability" => self.sales_availability.as_str().into(),
            "season_code" => self.season_code.as_str().into(),
            "status" => self.status.as_str().into(),
            other => FieldValue::from_json(self.data.get(other)),
        }
    }
}
