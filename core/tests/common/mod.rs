// tests/common/mod.rs
#![allow(dead_code)]

use once_cell::sync::Lazy;
use stockroom_core::{ContextData, Handler, PipelineControl, WorkflowError};
use tracing::Level;

/// A stand-in for a batch moving through intake: which steps touched it and
/// what they recorded.
#[derive(Clone, Debug, Default)]
pub struct IntakeContext {
  pub rows_seen: i32,
  pub notes: String,
  pub steps_executed: Vec<String>,
  pub stop_at: Option<String>,
  pub dry_run: bool,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("Workflow error: {0}")]
  Workflow(String),

  #[error("Step failed: {0}")]
  Step(String),
}

impl From<WorkflowError> for TestError {
  fn from(err: WorkflowError) -> Self {
    TestError::Workflow(format!("{:?}", err))
  }
}

pub fn recording_handler(step_name: &'static str, note: &'static str) -> Handler<IntakeContext, TestError> {
  Box::new(move |ctx: ContextData<IntakeContext>| {
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.rows_seen += 1;
      guard.notes.push_str(note);
      guard.steps_executed.push(step_name.to_string());
      if guard.stop_at.as_deref() == Some(step_name) {
        return Ok(PipelineControl::Stop);
      }
      Ok(PipelineControl::Continue)
    })
  })
}

pub fn failing_handler(step_name: &'static str, message: &'static str) -> Handler<IntakeContext, TestError> {
  Box::new(move |ctx: ContextData<IntakeContext>| {
    Box::pin(async move {
      ctx.write().steps_executed.push(step_name.to_string());
      Err(TestError::Step(message.to_string()))
    })
  })
}

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
