// tests/common/mod.rs
#![allow(dead_code)]

use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::sync::Arc;
use stockroom_core::{Product, ProductInsert};
use stockroom_server::config::AppConfig;
use stockroom_server::db::{MemoryProductRepository, ProductRepository, RepositoryError};
use stockroom_server::state::AppState;
use tracing::Level;

pub const TEST_BODY_LIMIT: usize = 64 * 1024;

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

pub fn test_config() -> AppConfig {
  AppConfig::from_lookup(|_| None).expect("default config")
}

pub fn memory_state() -> (AppState, Arc<MemoryProductRepository>) {
  setup_tracing();
  let repo = Arc::new(MemoryProductRepository::new());
  (AppState::new(test_config(), repo.clone()), repo)
}

/// A store whose every call fails, for exercising the 500 paths.
pub struct BrokenRepository;

#[async_trait]
impl ProductRepository for BrokenRepository {
  async fn create_many(&self, _products: &[ProductInsert]) -> Result<u64, RepositoryError> {
    Err(RepositoryError::Unavailable("connection refused".into()))
  }
  async fn find_many(&self, _user_id: &str) -> Result<Vec<Product>, RepositoryError> {
    Err(RepositoryError::Unavailable("connection refused".into()))
  }
  async fn find_unique(&self, _id: i64) -> Result<Option<Product>, RepositoryError> {
    Err(RepositoryError::Unavailable("connection refused".into()))
  }
  async fn delete(&self, _id: i64) -> Result<Option<Product>, RepositoryError> {
    Err(RepositoryError::Unavailable("connection refused".into()))
  }
}

pub fn broken_state() -> AppState {
  setup_tracing();
  AppState::new(test_config(), Arc::new(BrokenRepository))
}

/// Builds the full app (routes, JSON config, state) as an actix test service.
macro_rules! init_app {
  ($state:expr) => {
    actix_web::test::init_service(
      actix_web::App::new()
        .app_data(actix_web::web::Data::new($state.clone()))
        .configure(|cfg| stockroom_server::web::configure_app_routes(cfg, common::TEST_BODY_LIMIT)),
    )
    .await
  };
}
