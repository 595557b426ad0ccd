// src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use stockroom_core::{ApiResponse, WorkflowError};
use thiserror::Error;

use crate::db::RepositoryError;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Forbidden: {0}")]
  Forbidden(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  /// A store failure. `public_msg` is all the client gets to see.
  #[error("Store Error ({public_msg}): {source}")]
  Store {
    public_msg: &'static str,
    #[source]
    source: RepositoryError,
  },

  #[error("Workflow Error: {source}")]
  Workflow {
    #[from]
    source: WorkflowError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl AppError {
  pub fn store(public_msg: &'static str) -> impl FnOnce(RepositoryError) -> AppError {
    move |source| AppError::Store { public_msg, source }
  }

  /// The message placed in the failure envelope. Server-side failures never
  /// leak their cause.
  fn public_message(&self) -> String {
    match self {
      AppError::Validation(m) | AppError::Forbidden(m) | AppError::NotFound(m) => m.clone(),
      AppError::Store { public_msg, .. } => public_msg.to_string(),
      AppError::Config(_) | AppError::Workflow { .. } | AppError::Internal(_) => {
        "Server error".to_string()
      }
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::Forbidden(_) => StatusCode::FORBIDDEN,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with server error");
    } else {
      tracing::warn!(application_error = %self, status = status.as_u16(), "Responding with client error");
    }
    HttpResponse::build(status).json(ApiResponse::<()>::failure(self.public_message()))
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
