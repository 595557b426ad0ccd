// src/workflow/control.rs

/// Returned by a handler to tell the pipeline whether to keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineControl {
  Continue,
  /// Halt the run. No further handlers of this or later steps execute.
  Stop,
}

/// How a pipeline run ended when no handler failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineResult {
  Completed,
  /// A handler returned [`PipelineControl::Stop`] during the named step.
  Stopped { step: String },
}

impl PipelineResult {
  pub fn is_completed(&self) -> bool {
    matches!(self, PipelineResult::Completed)
  }
}
