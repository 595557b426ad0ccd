// src/entry.rs

//! The manual entry form: one record typed field by field.

use stockroom_core::{ProductInput, ValidationErrors};
use thiserror::Error;
use tracing::instrument;

use crate::rows::TextRow;
use crate::store::{BatchSubmitter, StoreError};

#[derive(Debug, Error)]
pub enum EntryError {
  #[error("{0}")]
  Invalid(#[from] ValidationErrors),

  #[error(transparent)]
  Submit(#[from] StoreError),
}

/// Raw form fields. Everything is text until validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryForm {
  pub sku: String,
  pub quantity: String,
  pub description: String,
  pub store: String,
}

impl Default for EntryForm {
  fn default() -> Self {
    Self {
      sku: String::new(),
      quantity: "0".to_string(),
      description: String::new(),
      store: String::new(),
    }
  }
}

impl EntryForm {
  /// Applies the same coercion and rules as a CSV row.
  pub fn validate(&self) -> Result<ProductInput, ValidationErrors> {
    self.as_row().validate()
  }

  /// Submits a one-record batch and clears the form. On any failure the
  /// fields are left as typed.
  #[instrument(name = "entry::submit", skip_all, fields(sku = %self.sku), err(Display))]
  pub async fn submit(&mut self, submitter: &dyn BatchSubmitter) -> Result<ProductInput, EntryError> {
    let input = self.validate()?;
    submitter.submit(vec![input.clone()]).await?;
    *self = EntryForm::default();
    Ok(input)
  }

  fn as_row(&self) -> TextRow {
    TextRow {
      sku: Some(self.sku.clone()),
      quantity: Some(self.quantity.clone()),
      description: Some(self.description.clone()),
      store: Some(self.store.clone()),
    }
  }
}
