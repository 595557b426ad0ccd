// src/rows.rs

use serde_json::{Map, Value};
use stockroom_core::{validate_product_input, ProductInput, ValidationErrors};

/// One record as typed or read from a file: every field is raw text, and a
/// field can be missing outright.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextRow {
  pub sku: Option<String>,
  pub quantity: Option<String>,
  pub description: Option<String>,
  pub store: Option<String>,
}

impl TextRow {
  /// Lifts the text fields into the untyped shape the shared schema checks.
  /// Number coercion and empty-description handling happen in the schema.
  pub fn to_value(&self) -> Value {
    let field = |v: &Option<String>| v.clone().map_or(Value::Null, Value::String);
    let mut obj = Map::new();
    obj.insert("sku".into(), field(&self.sku));
    obj.insert("quantity".into(), field(&self.quantity));
    obj.insert("description".into(), field(&self.description));
    obj.insert("store".into(), field(&self.store));
    Value::Object(obj)
  }

  pub fn validate(&self) -> Result<ProductInput, ValidationErrors> {
    validate_product_input(&self.to_value())
  }
}
