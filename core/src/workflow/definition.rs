// src/workflow/definition.rs

//! The `Pipeline<TData, Err>` type and its structural methods.

use super::context_data::ContextData;
use super::control::PipelineControl;
use super::step::{SkipCondition, StepDef};
use crate::error::WorkflowError;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

/// A boxed asynchronous step handler.
///
/// Handlers take a clone of the run's `ContextData<TData>`, lock it only for as
/// long as they need to read or write (never across an `.await`), and resolve
/// to a [`PipelineControl`] or the pipeline's error type.
pub type Handler<TData, Err> = Box<
  dyn Fn(ContextData<TData>) -> Pin<Box<dyn Future<Output = Result<PipelineControl, Err>> + Send>> + Send + Sync,
>;

/// Handlers attached to one step, grouped by phase.
pub(crate) struct StepHandlers<TData, Err>
where
  TData: 'static + Send + Sync,
{
  pub(crate) before: Vec<Handler<TData, Err>>,
  pub(crate) on: Vec<Handler<TData, Err>>,
  pub(crate) after: Vec<Handler<TData, Err>>,
}

impl<TData, Err> Default for StepHandlers<TData, Err>
where
  TData: 'static + Send + Sync,
{
  fn default() -> Self {
    Self {
      before: Vec::new(),
      on: Vec::new(),
      after: Vec::new(),
    }
  }
}

impl<TData, Err> StepHandlers<TData, Err>
where
  TData: 'static + Send + Sync,
{
  pub(crate) fn is_empty(&self) -> bool {
    self.before.is_empty() && self.on.is_empty() && self.after.is_empty()
  }
}

/// An ordered set of named steps operating on `ContextData<TData>`.
///
/// `Err` is what handlers fail with; it must absorb [`WorkflowError`] so the
/// engine can report its own failures (e.g. a required step with no handler)
/// through the same channel.
pub struct Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<WorkflowError> + Send + Sync + 'static,
{
  pub(crate) steps: Vec<StepDef<TData>>,
  pub(crate) handlers: HashMap<String, StepHandlers<TData, Err>>,
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<WorkflowError> + Send + Sync + 'static,
{
  /// Creates a pipeline from `(name, optional, skip_if)` triples, in run order.
  pub fn new(step_defs: &[(&str, bool, Option<SkipCondition<TData>>)]) -> Self {
    let steps = step_defs
      .iter()
      .map(|(name, optional, skip_if)| StepDef {
        name: (*name).to_string(),
        optional: *optional,
        skip_if: skip_if.clone(),
      })
      .collect();

    Self {
      steps,
      handlers: HashMap::new(),
    }
  }

  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name.as_str()).collect()
  }

  /// Replaces the skip condition of an existing step.
  pub fn set_skip_condition(&mut self, step_name: &str, skip_if: Option<SkipCondition<TData>>) {
    self.step_mut(step_name).skip_if = skip_if;
  }

  /// Panics on an unknown step name: a typo in pipeline wiring is a programming
  /// error, not a runtime condition.
  pub(crate) fn ensure_step_exists(&self, step_name: &str) {
    if !self.steps.iter().any(|s| s.name == step_name) {
      panic!("Pipeline setup error: step '{}' is not defined.", step_name);
    }
  }

  fn step_mut(&mut self, step_name: &str) -> &mut StepDef<TData> {
    match self.steps.iter_mut().find(|s| s.name == step_name) {
      Some(step) => step,
      None => panic!("Pipeline setup error: step '{}' is not defined.", step_name),
    }
  }
}
