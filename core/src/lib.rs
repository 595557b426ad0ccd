// src/lib.rs

//! Stockroom core: the pieces shared by the inventory server and its clients.
//!
//! - [`schema`]: the product record shapes and the one validation rule set both
//!   sides apply to incoming rows.
//! - [`envelope`]: the `{success, data | errorMsg}` response envelope every API
//!   endpoint speaks.
//! - [`workflow`]: a small asynchronous step-pipeline engine. Steps are named,
//!   carry before/on/after hooks, can be skipped by condition, and may stop the
//!   run early. A type-keyed [`workflow::Registry`] dispatches a pipeline by the
//!   type of its context data.

pub mod envelope;
pub mod error;
pub mod schema;
pub mod workflow;

// --- Re-exports for the Public API ---

pub use crate::envelope::{ApiResponse, CreatedCount, DeletedId};
pub use crate::error::{WorkflowError, WorkflowResult};
pub use crate::schema::{
  validate_insert_batch, validate_product_input, validate_product_insert, FieldError, Product, ProductInput,
  ProductInsert, ValidationErrors,
};
pub use crate::workflow::{ContextData, Handler, Pipeline, PipelineControl, PipelineResult, Registry, StepDef};

/// Name of the persisted key under which a client keeps its opaque user identifier.
pub const USER_ID_KEY: &str = "productManagerUserId";

/// Base path every API route lives under.
pub const API_BASE_PATH: &str = "/api/v1";
