//! Workflow error types

use planexec::{ExecutorError, RunState};
use thiserror::Error;

/// Errors raised by the workflow drivers
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A plan reached a terminal state other than complete
    #[error("Plan '{plan}' failed with terminal state '{state}'")]
    PlanFailed { plan: String, state: RunState },

    /// The executor itself failed
    #[error("Executor error: {0}")]
    Executor(#[from] ExecutorError),
}
