// src/pipelines/contexts.rs

//! Context data the write pipelines operate on. Handlers receive these wrapped
//! in `stockroom_core::ContextData`.

use std::sync::Arc;

use crate::db::ProductRepository;
use stockroom_core::{Product, ProductInsert};

#[derive(Clone)]
pub struct CreateProductsCtxData {
  pub repo: Arc<dyn ProductRepository>,
  /// The untouched request body; validated by the first step.
  pub body: serde_json::Value,
  pub validated: Vec<ProductInsert>,
  pub created_count: u64,
}

impl CreateProductsCtxData {
  pub fn new(repo: Arc<dyn ProductRepository>, body: serde_json::Value) -> Self {
    Self {
      repo,
      body,
      validated: Vec::new(),
      created_count: 0,
    }
  }
}

#[derive(Clone)]
pub struct DeleteProductCtxData {
  pub repo: Arc<dyn ProductRepository>,
  pub raw_id: String,
  pub requested_by: Option<String>,
  pub product_id: Option<i64>,
  pub found: Option<Product>,
  pub deleted_id: Option<i64>,
}

impl DeleteProductCtxData {
  pub fn new(repo: Arc<dyn ProductRepository>, raw_id: String, requested_by: Option<String>) -> Self {
    Self {
      repo,
      raw_id,
      requested_by,
      product_id: None,
      found: None,
      deleted_id: None,
    }
  }
}
