// src/db/mod.rs

//! Persistence adapter. Handlers and pipelines talk to a [`ProductRepository`];
//! `postgres` is the production backend, `memory` serves development runs
//! without a database and the test suites.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use stockroom_core::{Product, ProductInsert};
use thiserror::Error;

pub use memory::MemoryProductRepository;
pub use postgres::PgProductRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
  #[error("database error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("store unavailable: {0}")]
  Unavailable(String),
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
  /// Inserts the whole batch atomically and returns how many rows were written.
  async fn create_many(&self, products: &[ProductInsert]) -> Result<u64, RepositoryError>;

  /// Every product owned by `user_id`, oldest first.
  async fn find_many(&self, user_id: &str) -> Result<Vec<Product>, RepositoryError>;

  async fn find_unique(&self, id: i64) -> Result<Option<Product>, RepositoryError>;

  /// Deletes by id and returns the removed row, or `None` if it was already gone.
  async fn delete(&self, id: i64) -> Result<Option<Product>, RepositoryError>;
}
