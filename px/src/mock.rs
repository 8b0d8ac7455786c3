//! Scripted executor for tests
//!
//! Plays back a queue of pre-built PlanRun snapshots instead of talking to
//! a real service, and records every call made against it so tests can
//! assert on the exact transition sequence.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use uuid::Uuid;

use crate::clarification::Clarification;
use crate::error::ExecutorError;
use crate::executor::PlanExecutor;
use crate::plan::Plan;
use crate::run::PlanRun;

/// One call observed by a [`ScriptedExecutor`]
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    RunPlan { plan_name: String },
    Resolve { clarification_id: Uuid, value: Value },
    Reject { clarification_id: Uuid, reason: String },
    Resume { run_id: String },
    WaitForReady { run_id: String },
}

/// Executor that returns scripted run snapshots in order
///
/// `run_plan`, `resume`, and `wait_for_ready` each pop the next snapshot
/// off the script. `resolve_clarification` and `reject_clarification` do
/// not consume the script; they return the given run with the addressed
/// clarification marked resolved, mirroring a real executor's behavior of
/// not advancing execution until resumed.
#[derive(Default)]
pub struct ScriptedExecutor {
    script: Mutex<VecDeque<PlanRun>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a snapshot to the playback script
    pub fn push_run(&self, run: PlanRun) {
        self.script.lock().unwrap().push_back(run);
    }

    /// All calls recorded so far, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: RecordedCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_run(&self, requested_by: &str) -> Result<PlanRun, ExecutorError> {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ExecutorError::InvalidResponse(format!("Script exhausted at {requested_by}")))
    }

    fn resolved_copy(run: &PlanRun, clarification_id: Uuid) -> PlanRun {
        let mut updated = run.clone();
        for c in &mut updated.clarifications {
            if c.id == clarification_id {
                c.resolved = true;
            }
        }
        updated
    }
}

#[async_trait]
impl PlanExecutor for ScriptedExecutor {
    async fn run_plan(&self, plan: &Plan) -> Result<PlanRun, ExecutorError> {
        self.record(RecordedCall::RunPlan {
            plan_name: plan.name.clone(),
        });
        self.next_run("run_plan")
    }

    async fn resolve_clarification(
        &self,
        clarification: &Clarification,
        value: Value,
        run: &PlanRun,
    ) -> Result<PlanRun, ExecutorError> {
        self.record(RecordedCall::Resolve {
            clarification_id: clarification.id,
            value,
        });
        Ok(Self::resolved_copy(run, clarification.id))
    }

    async fn reject_clarification(
        &self,
        clarification: &Clarification,
        reason: &str,
        run: &PlanRun,
    ) -> Result<PlanRun, ExecutorError> {
        self.record(RecordedCall::Reject {
            clarification_id: clarification.id,
            reason: reason.to_string(),
        });
        Ok(Self::resolved_copy(run, clarification.id))
    }

    async fn resume(&self, run: &PlanRun) -> Result<PlanRun, ExecutorError> {
        self.record(RecordedCall::Resume { run_id: run.id.clone() });
        self.next_run("resume")
    }

    async fn wait_for_ready(&self, run: &PlanRun) -> Result<PlanRun, ExecutorError> {
        self.record(RecordedCall::WaitForReady { run_id: run.id.clone() });
        self.next_run("wait_for_ready")
    }
}
