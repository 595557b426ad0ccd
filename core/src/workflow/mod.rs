// src/workflow/mod.rs

//! Asynchronous step pipelines.
//!
//! A [`Pipeline<TData, Err>`] is an ordered list of named steps. Each step can
//! carry `before`, `on` and `after` handlers; all of them receive a clone of the
//! same [`ContextData<TData>`] and return a [`PipelineControl`] deciding whether
//! the run goes on. Handler failures abort the run and surface as `Err`.

pub mod context_data;
pub mod control;
pub mod definition;
pub mod execution;
pub mod hooks;
pub mod registry;
pub mod step;

pub use context_data::ContextData;
pub use control::{PipelineControl, PipelineResult};
pub use definition::{Handler, Pipeline};
pub use registry::Registry;
pub use step::{SkipCondition, StepDef};
