// src/pipelines/create_pipeline.rs

use crate::errors::AppError;
use crate::pipelines::contexts::CreateProductsCtxData;
use std::sync::Arc;
use stockroom_core::schema::{validate_insert_batch, BatchError};
use stockroom_core::{ContextData, Pipeline, PipelineControl, Registry};
use tracing::{info, instrument, warn};

pub fn register_create_products_pipeline(registry: &Registry<AppError>) {
  let mut p = Pipeline::<CreateProductsCtxData, AppError>::new(&[
    ("validate_batch", false, None),
    // Nothing to write for an empty batch.
    (
      "insert_batch",
      false,
      Some(Arc::new(|ctx: &ContextData<CreateProductsCtxData>| ctx.read().validated.is_empty())),
    ),
  ]);

  p.on_step("validate_batch", validate_batch_step);
  p.on_step("insert_batch", insert_batch_step);

  registry.register_pipeline(p);
  info!("Create products pipeline registered.");
}

/// Re-validates the whole body; one bad item rejects the request.
#[instrument(name = "create_products::validate_batch", skip_all, err(Display))]
async fn validate_batch_step(ctx: ContextData<CreateProductsCtxData>) -> Result<PipelineControl, AppError> {
  let outcome = validate_insert_batch(&ctx.read().body);

  match outcome {
    Ok(inserts) => {
      info!(rows = inserts.len(), "Create batch validated.");
      let mut guard = ctx.write();
      guard.validated = inserts;
      guard.body = serde_json::Value::Null;
      Ok(PipelineControl::Continue)
    }
    Err(err) => {
      warn!(error = %err, "API received bad create request.");
      let detail = match &err {
        BatchError::NotAnArray => "expected an array of products".to_string(),
        BatchError::Items(_) => err.to_string(),
      };
      Err(AppError::Validation(format!("Invalid input: {}", detail)))
    }
  }
}

#[instrument(name = "create_products::insert_batch", skip_all, err(Display))]
async fn insert_batch_step(ctx: ContextData<CreateProductsCtxData>) -> Result<PipelineControl, AppError> {
  let (repo, batch) = {
    let guard = ctx.read();
    (guard.repo.clone(), guard.validated.clone())
  }; // guard dropped before awaiting the store

  let count = repo
    .create_many(&batch)
    .await
    .map_err(AppError::store("Failed to create products"))?;

  info!(count, "Products created successfully.");
  ctx.write().created_count = count;
  Ok(PipelineControl::Continue)
}
