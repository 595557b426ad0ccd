// src/pipelines/mod.rs

//! Workflow pipelines behind the write endpoints. Each handler builds the
//! context for its pipeline and runs it through the registry held in `AppState`.

use crate::errors::AppError;
use stockroom_core::Registry;

pub mod contexts;
pub mod create_pipeline;
pub mod delete_pipeline;

/// Registers every pipeline with the registry. Called once while building `AppState`.
pub fn register_all_pipelines(registry: &Registry<AppError>) {
  tracing::info!("Registering workflow pipelines...");

  create_pipeline::register_create_products_pipeline(registry);
  delete_pipeline::register_delete_product_pipeline(registry);

  tracing::info!("All application pipelines registered.");
}
