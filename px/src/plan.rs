//! Plan domain types
//!
//! A Plan is a declarative, ordered sequence of tool-backed steps plus the
//! name of the structured schema the caller expects the final output to
//! conform to. Plans are immutable once built; building never fails.

use serde::{Deserialize, Serialize};

/// A single step of a Plan: a tool id and a natural-language instruction
///
/// There are no explicit inputs or outputs beyond what the tool id and
/// instruction imply - the executor infers bindings between steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStep {
    /// Natural-language instruction for the executor
    pub instruction: String,

    /// Stable tool id in the executor's registry
    pub tool_id: String,
}

/// An ordered sequence of steps with a declared result schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Human-readable plan name (used in logs and error reports)
    pub name: String,

    /// Name of the structured type the final output must conform to
    pub output_schema: String,

    /// Steps in execution order
    pub steps: Vec<PlanStep>,
}

impl Plan {
    /// Start building a plan with the given name and output schema
    pub fn builder(name: impl Into<String>, output_schema: impl Into<String>) -> PlanBuilder {
        PlanBuilder::new(name, output_schema)
    }
}

/// Builder for [`Plan`]
///
/// Pure and deterministic: the same inputs always produce the same plan,
/// and `build` cannot fail.
#[derive(Debug, Clone)]
pub struct PlanBuilder {
    name: String,
    output_schema: String,
    steps: Vec<PlanStep>,
}

impl PlanBuilder {
    /// Create a new builder
    pub fn new(name: impl Into<String>, output_schema: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            output_schema: output_schema.into(),
            steps: Vec::new(),
        }
    }

    /// Append a step
    pub fn step(mut self, instruction: impl Into<String>, tool_id: impl Into<String>) -> Self {
        self.steps.push(PlanStep {
            instruction: instruction.into(),
            tool_id: tool_id.into(),
        });
        self
    }

    /// Finalize the plan
    pub fn build(self) -> Plan {
        Plan {
            name: self.name,
            output_schema: self.output_schema,
            steps: self.steps,
        }
    }
}
