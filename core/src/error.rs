// src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

/// Framework-level failures raised by the workflow engine itself, as opposed to
/// the domain errors step handlers return.
#[derive(Debug, Error)]
pub enum WorkflowError {
  #[error("Handler missing for non-optional step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("No pipeline registered for context type {context_type}")]
  NotRegistered { context_type: String },

  #[error("Type mismatch while dispatching context (expected {expected_type})")]
  TypeMismatch { expected_type: String },

  #[error("Error in step handler: {source}")]
  HandlerError {
    #[source]
    source: AnyhowError,
  },
}

impl From<AnyhowError> for WorkflowError {
  fn from(err: AnyhowError) -> Self {
    // Unwrap a WorkflowError that was boxed into anyhow on the way up.
    match err.downcast::<WorkflowError>() {
      Ok(inner) => inner,
      Err(err) => WorkflowError::HandlerError { source: err },
    }
  }
}

pub type WorkflowResult<T, E = WorkflowError> = std::result::Result<T, E>;
