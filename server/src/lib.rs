// src/lib.rs

//! Stockroom HTTP API: list, create and delete products per opaque user id.

pub mod config;
pub mod db;
pub mod errors;
pub mod pipelines;
pub mod state;
pub mod web;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::{MemoryProductRepository, PgProductRepository, ProductRepository};
use crate::errors::{AppError, Result};

/// Picks the store for this run: PostgreSQL when `DATABASE_URL` is set,
/// process memory otherwise.
pub async fn connect_repository(config: &AppConfig) -> Result<Arc<dyn ProductRepository>> {
  match &config.database_url {
    Some(url) => {
      let repo = PgProductRepository::connect(url, config.db_max_connections)
        .await
        .map_err(|e| AppError::Config(format!("Failed to connect to the database: {}", e)))?;
      repo
        .ensure_schema()
        .await
        .map_err(|e| AppError::Config(format!("Failed to prepare the products table: {}", e)))?;
      Ok(Arc::new(repo))
    }
    None => {
      tracing::warn!("DATABASE_URL is not set; products are kept in memory and lost on restart.");
      Ok(Arc::new(MemoryProductRepository::new()))
    }
  }
}
