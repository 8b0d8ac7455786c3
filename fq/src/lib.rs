//! FeatureQuest - Feature Research and PRD Workflow Orchestrator
//!
//! FeatureQuest turns a natural-language feature request into a researched
//! analysis, a PRD document, and issue-tracker artifacts by delegating each
//! step to an LLM-driven plan executor and its external tool integrations
//! (web search, a document store, an issue tracker).
//!
//! # Core Concepts
//!
//! - **Plans, not API calls**: every external effect is a declarative plan
//!   submitted to the executor; the executor picks and invokes the tools
//! - **Clarification-driven execution**: when a step cannot proceed the run
//!   suspends with typed clarifications; the resolution loop collects the
//!   missing input and resumes from the suspension point
//! - **Best-effort side effects**: research failure aborts the workflow,
//!   but a failing PRD or issue integration never takes the others down
//!
//! # Modules
//!
//! - [`domain`] - Feature request, analysis, and tool output types
//! - [`clarify`] - Prompter trait and the clarification resolution loop
//! - [`workflow`] - Plan builders and the workflow runner
//! - [`session`] - In-memory research session tracking
//! - [`server`] - HTTP API surface
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod clarify;
pub mod config;
pub mod domain;
pub mod server;
pub mod session;
pub mod workflow;

pub use clarify::{ConsolePrompter, Prompter, ResolutionLoop, ScriptedPrompter};
pub use config::{Config, ExecutorConfig};
pub use domain::{
    Comment, CommentAuthor, CommentOutput, CommentsListOutput, FeatureAnalysis, FeatureRequest, IssueOutput,
    PageOutput, PrdContent, ResearchResult, TaskOutput,
};
pub use session::{Session, SessionStatus, SessionStore};
pub use workflow::{TaskKind, WorkflowError, WorkflowRunner};
