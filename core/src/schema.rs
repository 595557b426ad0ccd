// src/schema.rs

//! Product record shapes and the validation rules shared by client and server.
//!
//! Validation works on untyped `serde_json::Value`s so the same rules apply to
//! a request body, a CSV row or a form submission. A rule violation is
//! reported as a [`FieldError`]; all violations of one record are collected
//! rather than stopping at the first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// A persisted inventory record. `id` and `created_at` are assigned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Product {
  pub id: i64,
  pub user_id: String,
  pub created_at: DateTime<Utc>,
  pub sku: String,
  pub quantity: i64,
  pub description: Option<String>,
  pub store: String,
}

/// A validated record that has no owner yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
  pub sku: String,
  pub quantity: i64,
  pub description: Option<String>,
  pub store: String,
}

impl ProductInput {
  pub fn into_insert(self, user_id: impl Into<String>) -> ProductInsert {
    ProductInsert {
      user_id: user_id.into(),
      input: self,
    }
  }
}

/// A [`ProductInput`] paired with its owner, as sent to the create endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInsert {
  pub user_id: String,
  #[serde(flatten)]
  pub input: ProductInput,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
  pub field: String,
  pub message: String,
}

impl FieldError {
  fn new(field: &str, message: &str) -> Self {
    Self {
      field: field.to_string(),
      message: message.to_string(),
    }
  }
}

impl fmt::Display for FieldError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "'{}' {}", self.field, self.message)
  }
}

/// Every field-level failure found in one record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", join_display(.0, ", "))]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
  pub fn fields(&self) -> impl Iterator<Item = &str> {
    self.0.iter().map(|e| e.field.as_str())
  }

  pub fn has_field(&self, field: &str) -> bool {
    self.fields().any(|f| f == field)
  }
}

/// Failures of one record inside a batch; `row` is whatever numbering the caller reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
  pub row: usize,
  pub errors: ValidationErrors,
}

/// Renders row failures one per line as `"{label} {row}: 'field' message, ..."`.
pub fn render_row_errors(label: &str, rows: &[RowError]) -> String {
  rows
    .iter()
    .map(|r| format!("{} {}: {}", label, r.row, r.errors))
    .collect::<Vec<_>>()
    .join("\n")
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
  #[error("expected an array of products")]
  NotAnArray,
  /// Items are numbered from 0, in body order.
  #[error("{}", render_row_errors("Item", .0))]
  Items(Vec<RowError>),
}

fn join_display<T: fmt::Display>(items: &[T], sep: &str) -> String {
  items.iter().map(ToString::to_string).collect::<Vec<_>>().join(sep)
}

/// Validates one product row and normalizes it.
///
/// `sku` and `store` are trimmed and must not be empty. `quantity` must be a
/// non-negative integer; numeric strings are coerced. An empty `description`
/// becomes `None`. Unknown keys are ignored.
pub fn validate_product_input(value: &Value) -> Result<ProductInput, ValidationErrors> {
  let obj = as_record(value)?;
  let mut errors = Vec::new();
  let parsed = parse_input_fields(obj, &mut errors);
  match parsed {
    Some(input) if errors.is_empty() => Ok(input),
    _ => Err(ValidationErrors(errors)),
  }
}

/// Like [`validate_product_input`], plus a required non-empty `userId`.
pub fn validate_product_insert(value: &Value) -> Result<ProductInsert, ValidationErrors> {
  let obj = as_record(value)?;
  let mut errors = Vec::new();
  let user_id = required_text(obj, "userId", &mut errors);
  let input = parse_input_fields(obj, &mut errors);
  match (user_id, input) {
    (Some(user_id), Some(input)) if errors.is_empty() => Ok(ProductInsert { user_id, input }),
    _ => Err(ValidationErrors(errors)),
  }
}

/// Validates a create-request body. All-or-nothing: one bad item rejects the
/// whole batch and every bad item is reported. An empty array is valid.
pub fn validate_insert_batch(value: &Value) -> Result<Vec<ProductInsert>, BatchError> {
  let items = value.as_array().ok_or(BatchError::NotAnArray)?;
  let mut inserts = Vec::with_capacity(items.len());
  let mut failures = Vec::new();
  for (row, item) in items.iter().enumerate() {
    match validate_product_insert(item) {
      Ok(insert) => inserts.push(insert),
      Err(errors) => failures.push(RowError { row, errors }),
    }
  }
  if failures.is_empty() {
    Ok(inserts)
  } else {
    Err(BatchError::Items(failures))
  }
}

fn as_record(value: &Value) -> Result<&Map<String, Value>, ValidationErrors> {
  value
    .as_object()
    .ok_or_else(|| ValidationErrors(vec![FieldError::new("record", "must be an object")]))
}

fn parse_input_fields(obj: &Map<String, Value>, errors: &mut Vec<FieldError>) -> Option<ProductInput> {
  let sku = required_text(obj, "sku", errors);
  let quantity = quantity(obj, errors);
  let description = optional_text(obj, "description", errors);
  let store = required_text(obj, "store", errors);
  Some(ProductInput {
    sku: sku?,
    quantity: quantity?,
    description: description?,
    store: store?,
  })
}

fn required_text(obj: &Map<String, Value>, field: &str, errors: &mut Vec<FieldError>) -> Option<String> {
  match obj.get(field) {
    None | Some(Value::Null) => {
      errors.push(FieldError::new(field, "is required"));
      None
    }
    Some(Value::String(s)) if s.trim().is_empty() => {
      errors.push(FieldError::new(field, "must not be empty"));
      None
    }
    Some(Value::String(s)) => Some(s.trim().to_string()),
    Some(_) => {
      errors.push(FieldError::new(field, "must be a string"));
      None
    }
  }
}

fn optional_text(obj: &Map<String, Value>, field: &str, errors: &mut Vec<FieldError>) -> Option<Option<String>> {
  match obj.get(field) {
    None | Some(Value::Null) => Some(None),
    Some(Value::String(s)) if s.trim().is_empty() => Some(None),
    Some(Value::String(s)) => Some(Some(s.clone())),
    Some(_) => {
      errors.push(FieldError::new(field, "must be a string"));
      None
    }
  }
}

fn quantity(obj: &Map<String, Value>, errors: &mut Vec<FieldError>) -> Option<i64> {
  const FIELD: &str = "quantity";
  let checked = match obj.get(FIELD) {
    None | Some(Value::Null) => Err("is required"),
    Some(Value::Number(n)) => match (n.as_i64(), n.as_f64()) {
      (Some(int), _) => non_negative(int),
      (None, _) if n.is_u64() => Err("is too large"),
      (None, Some(float)) => integral(float),
      (None, None) => Err("must be a number"),
    },
    Some(Value::String(s)) if s.trim().is_empty() => Err("is required"),
    Some(Value::String(s)) => parse_numeric_text(s.trim()),
    Some(_) => Err("must be a number"),
  };
  checked.map_err(|message| errors.push(FieldError::new(FIELD, message))).ok()
}

fn parse_numeric_text(text: &str) -> Result<i64, &'static str> {
  if let Ok(int) = text.parse::<i64>() {
    return non_negative(int);
  }
  match text.parse::<f64>() {
    Ok(float) if float.is_finite() => integral(float),
    _ => Err("must be a number"),
  }
}

fn integral(float: f64) -> Result<i64, &'static str> {
  if float.fract() != 0.0 {
    return Err("must be an integer");
  }
  if float < 0.0 {
    return Err("must be non-negative");
  }
  if float >= i64::MAX as f64 {
    return Err("is too large");
  }
  Ok(float as i64)
}

fn non_negative(int: i64) -> Result<i64, &'static str> {
  if int < 0 {
    Err("must be non-negative")
  } else {
    Ok(int)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn accepts_valid_row_and_normalizes() {
    let input = validate_product_input(&json!({
      "sku": " ABC-1 ",
      "quantity": 12.0,
      "description": "",
      "store": "LON"
    }))
    .unwrap();
    assert_eq!(
      input,
      ProductInput {
        sku: "ABC-1".into(),
        quantity: 12,
        description: None,
        store: "LON".into(),
      }
    );
  }

  #[test]
  fn coerces_numeric_strings() {
    let input = validate_product_input(&json!({"sku": "a", "quantity": "7", "store": "s"})).unwrap();
    assert_eq!(input.quantity, 7);
    assert_eq!(input.description, None);
  }

  #[test]
  fn reports_every_bad_field_in_order() {
    let err = validate_product_input(&json!({"quantity": -3, "description": 5})).unwrap_err();
    assert_eq!(
      err.to_string(),
      "'sku' is required, 'quantity' must be non-negative, 'description' must be a string, 'store' is required"
    );
  }

  #[test]
  fn rejects_fractional_and_non_numeric_quantities() {
    let frac = validate_product_input(&json!({"sku": "a", "quantity": 1.5, "store": "s"})).unwrap_err();
    assert_eq!(frac.to_string(), "'quantity' must be an integer");

    let text = validate_product_input(&json!({"sku": "a", "quantity": "abc", "store": "s"})).unwrap_err();
    assert_eq!(text.to_string(), "'quantity' must be a number");

    let huge = validate_product_input(&json!({"sku": "a", "quantity": u64::MAX, "store": "s"})).unwrap_err();
    assert_eq!(huge.to_string(), "'quantity' is too large");
  }

  #[test]
  fn whitespace_only_store_is_empty() {
    let err = validate_product_input(&json!({"sku": "a", "quantity": 1, "store": "   "})).unwrap_err();
    assert!(err.has_field("store"));
    assert_eq!(err.to_string(), "'store' must not be empty");
  }

  #[test]
  fn insert_requires_user_id() {
    let err = validate_product_insert(&json!({"sku": "a", "quantity": 1, "store": "s"})).unwrap_err();
    assert_eq!(err.to_string(), "'userId' is required");

    let ok = validate_product_insert(&json!({"userId": "u1", "sku": "a", "quantity": 1, "store": "s"})).unwrap();
    assert_eq!(ok.user_id, "u1");
  }

  #[test]
  fn batch_is_all_or_nothing() {
    let body = json!([
      {"userId": "u", "sku": "a", "quantity": 1, "store": "s"},
      {"userId": "u", "sku": "", "quantity": 1, "store": "s"},
      {"userId": "u", "sku": "c", "quantity": "x", "store": "s"}
    ]);
    match validate_insert_batch(&body) {
      Err(BatchError::Items(rows)) => {
        assert_eq!(rows.iter().map(|r| r.row).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(
          render_row_errors("Item", &rows),
          "Item 1: 'sku' must not be empty\nItem 2: 'quantity' must be a number"
        );
      }
      other => panic!("expected item failures, got {:?}", other),
    }
  }

  #[test]
  fn empty_batch_is_valid_and_object_body_is_not() {
    assert_eq!(validate_insert_batch(&json!([])).unwrap(), Vec::new());
    assert_eq!(validate_insert_batch(&json!({})).unwrap_err(), BatchError::NotAnArray);
  }

  #[test]
  fn insert_serializes_flat_camel_case() {
    let insert = ProductInput {
      sku: "a".into(),
      quantity: 2,
      description: Some("d".into()),
      store: "s".into(),
    }
    .into_insert("u9");
    assert_eq!(
      serde_json::to_value(&insert).unwrap(),
      json!({"userId": "u9", "sku": "a", "quantity": 2, "description": "d", "store": "s"})
    );
  }
}
