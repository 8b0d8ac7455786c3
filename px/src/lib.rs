//! PlanExec - Plan Executor contract and client
//!
//! PlanExec models the execution protocol of a hosted LLM plan executor:
//! a Plan is an ordered list of tool-backed steps plus a declared output
//! schema; submitting one yields a PlanRun that either completes, fails,
//! or pauses mid-execution with outstanding Clarifications that must be
//! resolved before the run can be resumed.
//!
//! # Core Concepts
//!
//! - **Plans are declarative**: a step is just a tool id and an English
//!   instruction; the executor infers the bindings between steps
//! - **Runs are owned by the executor**: callers only read a PlanRun and
//!   request transitions (resolve, resume, wait-for-ready) on it
//! - **Clarifications are typed**: five categories, each with its own
//!   resolution contract
//!
//! # Modules
//!
//! - [`plan`] - Plan, PlanStep, and the PlanBuilder
//! - [`run`] - PlanRun and its state machine
//! - [`clarification`] - Clarification categories and payloads
//! - [`executor`] - The PlanExecutor trait
//! - [`client`] - HTTP client for a hosted executor service
//! - [`mock`] - Scripted executor for tests

pub mod clarification;
pub mod client;
pub mod error;
pub mod executor;
pub mod mock;
pub mod plan;
pub mod run;

pub use clarification::{Clarification, ClarificationKind};
pub use client::CloudExecutor;
pub use error::ExecutorError;
pub use executor::PlanExecutor;
pub use mock::{RecordedCall, ScriptedExecutor};
pub use plan::{Plan, PlanBuilder, PlanStep};
pub use run::{FinalOutput, PlanRun, RunOutputs, RunState};
