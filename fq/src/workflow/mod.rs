//! Workflow drivers
//!
//! Each driver builds a plan, executes it through the clarification
//! resolution loop, and decodes the structured output. Research failure
//! aborts the workflow; the document and tracker integrations are
//! best-effort and contained.

pub mod error;
pub mod plans;
pub mod runner;
pub mod triage;

pub use error::WorkflowError;
pub use plans::TaskKind;
pub use runner::{WorkflowOutcome, WorkflowRunner};
