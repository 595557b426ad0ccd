// tests/common/mod.rs
#![allow(dead_code)]

use actix_web::{web, App, HttpServer};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use stockroom_client::{BatchSubmitter, IdentityStore, ProductStoreClient, StoreError};
use stockroom_core::ProductInput;
use stockroom_server::config::AppConfig;
use stockroom_server::db::MemoryProductRepository;
use stockroom_server::state::AppState;
use stockroom_server::web::configure_app_routes;
use tracing::Level;

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

pub const HEADER: &str = "sku,quantity,description,store";

/// Remembers every batch it is handed.
#[derive(Default)]
pub struct RecordingSubmitter {
  pub batches: Mutex<Vec<Vec<ProductInput>>>,
}

impl RecordingSubmitter {
  pub fn calls(&self) -> usize {
    self.batches.lock().len()
  }
}

#[async_trait]
impl BatchSubmitter for RecordingSubmitter {
  async fn submit(&self, batch: Vec<ProductInput>) -> Result<(), StoreError> {
    self.batches.lock().push(batch);
    Ok(())
  }
}

/// Always refuses, the way the API does for a bad batch.
pub struct RejectingSubmitter;

#[async_trait]
impl BatchSubmitter for RejectingSubmitter {
  async fn submit(&self, _batch: Vec<ProductInput>) -> Result<(), StoreError> {
    Err(StoreError::Api("Failed to create products".into()))
  }
}

pub fn scratch_identity() -> IdentityStore {
  let dir: PathBuf = std::env::temp_dir().join(format!("stockroom-client-test-{}", uuid::Uuid::new_v4()));
  IdentityStore::new(dir.join("identity.json"))
}

/// Starts the real API over a memory store on an ephemeral port and returns
/// its base URL (with the version prefix).
pub async fn spawn_api() -> (String, Arc<MemoryProductRepository>) {
  setup_tracing();
  let repo = Arc::new(MemoryProductRepository::new());
  let config = AppConfig::from_lookup(|_| None).expect("default config");
  let state = AppState::new(config, repo.clone());

  let server = HttpServer::new(move || {
    App::new()
      .app_data(web::Data::new(state.clone()))
      .configure(|cfg| configure_app_routes(cfg, 64 * 1024))
  })
  .workers(1)
  .bind(("127.0.0.1", 0))
  .expect("bind ephemeral port");

  let addr = server.addrs()[0];
  actix_web::rt::spawn(server.run());
  (format!("http://{}/api/v1", addr), repo)
}

pub async fn spawn_client() -> (ProductStoreClient, Arc<MemoryProductRepository>) {
  let (base_url, repo) = spawn_api().await;
  (ProductStoreClient::new(base_url, scratch_identity()), repo)
}

pub fn input(sku: &str, quantity: i64, store: &str) -> ProductInput {
  ProductInput {
    sku: sku.into(),
    quantity,
    description: None,
    store: store.into(),
  }
}
