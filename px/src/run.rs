//! PlanRun - one execution instance of a Plan
//!
//! A PlanRun is owned by the executor. Callers read its state and request
//! transitions (resolve a clarification, resume, wait for ready); they
//! never mutate it directly.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clarification::Clarification;

/// Execution state of a PlanRun
///
/// `Running` is transient and never observed by callers: `run_plan` and
/// the transition requests block until the run settles into one of the
/// other states. `NeedClarification` is not terminal - resolving the
/// outstanding clarifications and resuming moves the run onward, possibly
/// into another `NeedClarification`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    #[default]
    Running,
    NeedClarification,
    Complete,
    Failed,
    /// State this client does not know about; treated as failure by callers
    #[serde(other)]
    Unknown,
}

impl RunState {
    /// Whether the run can make no further progress
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Failed | Self::Unknown)
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::NeedClarification => write!(f, "need_clarification"),
            Self::Complete => write!(f, "complete"),
            Self::Failed => write!(f, "failed"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// The structured final output of a completed run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinalOutput {
    /// Value conforming to the plan's declared output schema. Tool-backed
    /// steps are known to sometimes return the serialized form as a plain
    /// string instead of the structured value; callers must decode
    /// defensively.
    pub value: Value,
}

/// Outputs produced by a run so far
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunOutputs {
    /// Per-step outputs in execution order
    #[serde(default)]
    pub step_outputs: Vec<Value>,

    /// Present only once the run is complete
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_output: Option<FinalOutput>,
}

/// A mutable execution instance of a Plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRun {
    /// Executor-assigned run id
    pub id: String,

    /// Name of the plan this run executes
    pub plan_name: String,

    /// Current state
    pub state: RunState,

    /// Outputs produced so far
    #[serde(default)]
    pub outputs: RunOutputs,

    /// All clarifications raised so far, resolved or not. The run holds
    /// unresolved entries if and only if state == NeedClarification.
    #[serde(default)]
    pub clarifications: Vec<Clarification>,
}

impl PlanRun {
    /// Clarifications still awaiting resolution, in the order the
    /// executor reported them
    pub fn outstanding_clarifications(&self) -> Vec<Clarification> {
        self.clarifications.iter().filter(|c| !c.resolved).cloned().collect()
    }

    /// Whether the run reached a terminal state
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// The final output value, if the run completed with one
    pub fn final_value(&self) -> Option<&Value> {
        self.outputs.final_output.as_ref().map(|o| &o.value)
    }
}
