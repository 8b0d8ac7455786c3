//! PlanExecutor trait definition

use async_trait::async_trait;
use serde_json::Value;

use crate::clarification::Clarification;
use crate::error::ExecutorError;
use crate::plan::Plan;
use crate::run::PlanRun;

/// The execution protocol of a plan executor
///
/// This is the only surface callers have onto a run: submit a plan, read
/// back a PlanRun, and request transitions on it. Every method blocks
/// until the run settles into a non-Running state, which may still be the
/// non-terminal NeedClarification.
///
/// Resolving a clarification never implicitly resumes the run; callers
/// must resolve every outstanding clarification and then issue a single
/// `resume`.
#[async_trait]
pub trait PlanExecutor: Send + Sync {
    /// Submit a plan for execution
    async fn run_plan(&self, plan: &Plan) -> Result<PlanRun, ExecutorError>;

    /// Resolve a single outstanding clarification with a value
    async fn resolve_clarification(
        &self,
        clarification: &Clarification,
        value: Value,
        run: &PlanRun,
    ) -> Result<PlanRun, ExecutorError>;

    /// Report a clarification as rejected rather than resolved
    ///
    /// Used when a value confirmation is declined: the executor receives
    /// an error signal carrying a human-readable reason, not a value.
    async fn reject_clarification(
        &self,
        clarification: &Clarification,
        reason: &str,
        run: &PlanRun,
    ) -> Result<PlanRun, ExecutorError>;

    /// Resume a run whose outstanding clarifications have been resolved
    async fn resume(&self, run: &PlanRun) -> Result<PlanRun, ExecutorError>;

    /// Block until the executor observes the out-of-band action for an
    /// action clarification as complete
    async fn wait_for_ready(&self, run: &PlanRun) -> Result<PlanRun, ExecutorError>;
}
