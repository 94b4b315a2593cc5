use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use plmgate_core::{Entity, EntityType, FieldSpec, FieldValue, Record, StyleCode};

/// Entity marker: Style (a catalog-level product definition).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Style;

impl Entity for Style {
    type Request = StyleRequest;
    type Master = MasterStyle;

    const TYPE: EntityType = EntityType::Style;
    const NATURAL_KEY: &'static str = "style_code";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("style_code"),
        FieldSpec::required("name"),
        FieldSpec::required("category"),
        FieldSpec::required("gender"),
        FieldSpec::required("size_range"),
        FieldSpec::required("vertical"),
        FieldSpec::required("season_code"),
        FieldSpec::optional("origin_country"),
        FieldSpec::optional("product_type"),
    ];
}

/// Proposed state of a style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleRequest {
    pub style_code: StyleCode,
    pub name: String,
    pub category: String,
    pub gender: String,
    pub size_range: String,
    pub vertical: String,
    pub season_code: String,
    #[serde(default, skip_serializing_if = "FieldValue::is_undefined")]
    pub origin_country: FieldValue,
    #[serde(default, skip_serializing_if = "FieldValue::is_undefined")]
    pub product_type: FieldValue,
}

impl Record for StyleRequest {
    fn natural_key(&self) -> &str {
        self.style_code.as_str()
    }

    fn field(&self, name: &str) -> FieldValue {
        match name {
            "style_code" => self.style_code.as_str().into(),
            "name" => self.name.as_str().into(),
            "category" => self.category.as_str().into(),
            "gender" => self.gender.as_str().into(),
            "size_range" => self.size_range.as_str().into(),
            "vertical" => self.vertical.as_str().into(),
            "season_code" => self.season_code.as_str().into(),
            "origin_country" => self.origin_country.clone(),
            "product_type" => self.product_type.clone(),
            _ => FieldValue::Undefined,
        }
    }
}

/// Master snapshot of a style as persisted in the system of record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterStyle {
    pub style_code: StyleCode,
    pub name: String,
    pub category: String,
    pub gender: String,
    pub size_range: String,
    pub vertical: String,
    pub season_code: String,
    pub status: String,
    /// Open-ended extension attributes.
    #[serde(default)]
    pub data: Map<String, JsonValue>,
}

impl MasterStyle {
    /// Snapshot of a committed request.
    ///
    /// Optional request fields that were set (or explicitly null) land in `data`.
    pub fn snapshot(request: &StyleRequest, status: impl Into<String>) -> Self {
        let mut data = Map::new();
        for (key, value) in [
            ("origin_country", &request.origin_country),
            ("product_type", &request.product_type),
        ] {
            if !value.is_undefined() {
                data.insert(key.to_string(), value.to_json());
            }
        }

        Self {
            style_code: request.style_code.clone(),
            name: request.name.clone(),
            category: request.category.clone(),
            gender: request.gender.clone(),
            size_range: request.size_range.clone(),
            vertical: request.vertical.clone(),
            season_code: request.season_code.clone(),
            status: status.into(),
            data,
        }
    }
}

impl Record for MasterStyle {
    fn natural_key(&self) -> &str {
        self.style_code.as_str()
    }

    fn field(&self, name: &str) -> FieldValue {
        match name {
            "style_code" => self.style_code.as_str().into(),
            "name" => self.name.as_str().into(),
            "category" => self.category.as_str().into(),
            "gender" => self.gender.as_str().into(),
            "size_range" => self.size_range.as_str().into(),
            "vertical" => self.vertical.as_str().into(),
            "season_code" => self.season_code.as_str().into(),
            "status" => self.status.as_str().into(),
            other => FieldValue::from_json(self.data.get(other)),
        }
    }
}
