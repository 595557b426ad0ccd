// src/state.rs
use crate::config::AppConfig;
use crate::db::ProductRepository;
use crate::errors::AppError;
use std::sync::Arc;
use stockroom_core::Registry;

#[derive(Clone)]
pub struct AppState {
  pub repo: Arc<dyn ProductRepository>,
  pub workflows: Arc<Registry<AppError>>,
  pub config: Arc<AppConfig>,
}

impl AppState {
  /// Wires a repository into fresh state and registers every pipeline.
  pub fn new(config: AppConfig, repo: Arc<dyn ProductRepository>) -> Self {
    let state = AppState {
      repo,
      workflows: Arc::new(Registry::new()),
      config: Arc::new(config),
    };
    crate::pipelines::register_all_pipelines(&state.workflows);
    state
  }
}
