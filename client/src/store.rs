// src/store.rs

//! HTTP client for the product API.
//!
//! Every write is followed by a refetch; the last fetched list is kept as the
//! client's view of the server and is never patched locally.

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use stockroom_core::{ApiResponse, CreatedCount, DeletedId, Product, ProductInput, ProductInsert};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::identity::{IdentityError, IdentityStore};

const FETCH_FAILED: &str = "Failed to fetch products";
const CREATE_FAILED: &str = "Failed to create products";
const DELETE_FAILED: &str = "Failed to delete product";

#[derive(Debug, Error)]
pub enum StoreError {
  /// The server answered with `success: false`; carries its message.
  #[error("{0}")]
  Api(String),

  #[error("{context}")]
  Transport {
    context: &'static str,
    #[source]
    source: reqwest::Error,
  },

  #[error("A submission is already in progress")]
  Busy,

  #[error(transparent)]
  Identity(#[from] IdentityError),
}

impl StoreError {
  /// For use with `map_err` on a request future.
  pub fn transport(context: &'static str) -> impl FnOnce(reqwest::Error) -> StoreError {
    move |source| StoreError::Transport { context, source }
  }
}

/// Receives a fully validated batch, in input order, in one call.
#[async_trait]
pub trait BatchSubmitter: Send + Sync {
  async fn submit(&self, batch: Vec<ProductInput>) -> Result<(), StoreError>;
}

pub struct ProductStoreClient {
  http: reqwest::Client,
  base_url: String,
  identity: IdentityStore,
  user_id: OnceCell<String>,
  products: RwLock<Vec<Product>>,
  submission_gate: Mutex<()>,
}

impl ProductStoreClient {
  pub fn new(base_url: impl Into<String>, identity: IdentityStore) -> Self {
    Self::with_http(reqwest::Client::new(), base_url, identity)
  }

  pub fn with_http(http: reqwest::Client, base_url: impl Into<String>, identity: IdentityStore) -> Self {
    Self {
      http,
      base_url: base_url.into().trim_end_matches('/').to_string(),
      identity,
      user_id: OnceCell::new(),
      products: RwLock::new(Vec::new()),
      submission_gate: Mutex::new(()),
    }
  }

  /// The client's identifier; created and persisted on first use.
  pub fn user_id(&self) -> Result<&str, StoreError> {
    let id = self.user_id.get_or_try_init(|| self.identity.load_or_create())?;
    Ok(id.as_str())
  }

  /// The list as of the last successful fetch.
  pub fn snapshot(&self) -> Vec<Product> {
    self.products.read().clone()
  }

  #[instrument(name = "store::list", skip(self), err(Display))]
  pub async fn list(&self) -> Result<Vec<Product>, StoreError> {
    let user_id = self.user_id()?;
    let resp = self
      .http
      .get(self.url("/products"))
      .query(&[("userId", user_id)])
      .send()
      .await
      .map_err(StoreError::transport(FETCH_FAILED))?;

    let products: Vec<Product> = read_envelope(resp, FETCH_FAILED).await?;
    debug!(count = products.len(), "Fetched products.");
    *self.products.write() = products.clone();
    Ok(products)
  }

  /// Submits `inputs` as one batch owned by this client, then refetches.
  #[instrument(name = "store::create", skip_all, fields(rows = inputs.len()), err(Display))]
  pub async fn create(&self, inputs: Vec<ProductInput>) -> Result<Vec<Product>, StoreError> {
    let _submission = self.submission_gate.try_lock().map_err(|_| StoreError::Busy)?;
    let user_id = self.user_id()?;
    let batch: Vec<ProductInsert> = inputs.into_iter().map(|input| input.into_insert(user_id)).collect();

    let resp = self
      .http
      .post(self.url("/products"))
      .json(&batch)
      .send()
      .await
      .map_err(StoreError::transport(CREATE_FAILED))?;

    let created: CreatedCount = read_envelope(resp, CREATE_FAILED).await?;
    info!(count = created.count, "Products created.");
    self.list().await
  }

  #[instrument(name = "store::remove", skip(self), err(Display))]
  pub async fn remove(&self, id: i64) -> Result<Vec<Product>, StoreError> {
    let user_id = self.user_id()?;
    let resp = self
      .http
      .delete(self.url(&format!("/products/{}", id)))
      .query(&[("userId", user_id)])
      .send()
      .await
      .map_err(StoreError::transport(DELETE_FAILED))?;

    let deleted: DeletedId = read_envelope(resp, DELETE_FAILED).await?;
    info!(id = deleted.id, "Product deleted.");
    self.list().await
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.base_url, path)
  }
}

#[async_trait]
impl BatchSubmitter for ProductStoreClient {
  async fn submit(&self, batch: Vec<ProductInput>) -> Result<(), StoreError> {
    self.create(batch).await.map(|_| ())
  }
}

/// Decodes the envelope whatever the status code; error statuses carry one too.
async fn read_envelope<T: DeserializeOwned>(resp: reqwest::Response, context: &'static str) -> Result<T, StoreError> {
  let status = resp.status();
  let envelope: ApiResponse<T> = resp.json().await.map_err(StoreError::transport(context))?;
  envelope.into_result().map_err(|msg| {
    warn!(%status, error = %msg, "API rejected the request.");
    StoreError::Api(msg)
  })
}
