//! Workflow runner
//!
//! Executes the research / PRD / issue / task / comment drivers against the
//! plan executor. Every driver runs its plan through the clarification
//! resolution loop before inspecting the terminal state. Research failure
//! escalates; the document and tracker integrations are contained so one
//! failing side effect never aborts the others.

use chrono::Local;
use eyre::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

use planexec::{Plan, PlanExecutor, PlanRun, RunState};

use crate::clarify::{Prompter, ResolutionLoop};
use crate::domain::{Comment, CommentOutput, CommentsListOutput, FeatureAnalysis, FeatureRequest, IssueOutput, PageOutput, TaskOutput};
use crate::session::{SessionStatus, SessionStore};
use crate::workflow::error::WorkflowError;
use crate::workflow::plans;
use crate::workflow::plans::TaskKind;
use crate::workflow::triage;

/// Summary of one complete workflow run
#[derive(Debug, Clone)]
pub struct WorkflowOutcome {
    pub analysis: FeatureAnalysis,
    pub analysis_file: PathBuf,
    pub page_id: Option<String>,
    pub issue_id: Option<String>,
    pub tasks: Vec<TaskOutput>,
}

/// Drives the feature research workflow end to end
pub struct WorkflowRunner {
    executor: Arc<dyn PlanExecutor>,
    resolver: ResolutionLoop,
    prompter: Arc<dyn Prompter>,
    output_dir: PathBuf,
}

impl WorkflowRunner {
    pub fn new(executor: Arc<dyn PlanExecutor>, prompter: Arc<dyn Prompter>, output_dir: PathBuf) -> Self {
        let resolver = ResolutionLoop::new(executor.clone(), prompter.clone());
        Self {
            executor,
            resolver,
            prompter,
            output_dir,
        }
    }

    /// Run a plan to a terminal state, draining clarifications as needed
    ///
    /// Returns the completed run; any other terminal state becomes a
    /// WorkflowError naming the failed plan.
    pub async fn execute(&self, plan: Plan) -> Result<PlanRun> {
        debug!(plan = %plan.name, "execute: called");
        let mut run = self.executor.run_plan(&plan).await.map_err(WorkflowError::Executor)?;

        if run.state == RunState::NeedClarification {
            info!(plan = %plan.name, "execute: clarifications needed");
            run = self.resolver.drain(run).await?;
        }

        match run.state {
            RunState::Complete => {
                debug!(plan = %plan.name, run_id = %run.id, "execute: plan complete");
                Ok(run)
            }
            state => {
                warn!(plan = %plan.name, %state, "execute: plan reached non-complete terminal state");
                Err(WorkflowError::PlanFailed { plan: plan.name, state }.into())
            }
        }
    }

    /// Best-effort decode of a completed run's final output
    ///
    /// Executors sometimes return the serialized form as a plain string
    /// instead of the structured value. Try the string re-parse first,
    /// then a direct conversion; failure degrades to the type's default
    /// with a logged warning so the rest of the workflow still runs.
    fn decode_output<T: DeserializeOwned + Default>(&self, run: &PlanRun) -> T {
        let Some(value) = run.final_value() else {
            warn!(run_id = %run.id, "decode_output: run completed without a final output");
            return T::default();
        };

        let decoded = match value {
            Value::String(raw) => serde_json::from_str(raw).map_err(|e| e.to_string()),
            other => serde_json::from_value(other.clone()).map_err(|e| e.to_string()),
        };

        match decoded {
            Ok(output) => output,
            Err(e) => {
                warn!(run_id = %run.id, error = %e, "decode_output: payload does not match declared schema");
                T::default()
            }
        }
    }

    /// Research the feature (escalating: failure aborts the workflow)
    pub async fn research(&self, request: &FeatureRequest) -> Result<FeatureAnalysis> {
        info!(feature = %request.name, "research: called");
        let run = self.execute(plans::research_plan(request)).await?;

        let mut analysis: FeatureAnalysis = self.decode_output(&run);
        if analysis.feature_name.is_empty() {
            analysis.feature_name = request.name.clone();
        }
        if analysis.description.is_empty() {
            analysis.description = request.description.clone();
        }
        Ok(analysis)
    }

    /// Persist the analysis as a timestamped JSON artifact
    pub fn save_analysis(&self, analysis: &FeatureAnalysis) -> Result<PathBuf> {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let filename = format!(
            "feature_analysis_{}_{}.json",
            analysis.feature_name.replace(' ', "_"),
            timestamp
        );

        fs::create_dir_all(&self.output_dir).context("Failed to create output directory")?;
        let path = self.output_dir.join(filename);

        let json = serde_json::to_string_pretty(analysis)?;
        fs::write(&path, json).context("Failed to write analysis file")?;

        info!(path = %path.display(), "save_analysis: analysis saved");
        Ok(path)
    }

    /// Create the PRD page and return its id
    pub async fn create_prd_page(&self, analysis: &FeatureAnalysis) -> Result<String> {
        info!(feature = %analysis.feature_name, "create_prd_page: called");
        let run = self.execute(plans::prd_plan(analysis)).await?;
        let page: PageOutput = self.decode_output(&run);
        Ok(page.page_id)
    }

    /// Create the feature issue in the tracker
    pub async fn create_issue(&self, analysis: &FeatureAnalysis) -> Result<IssueOutput> {
        info!(feature = %analysis.feature_name, "create_issue: called");
        let run = self.execute(plans::issue_plan(analysis)).await?;
        Ok(self.decode_output(&run))
    }

    /// Create the four implementation tasks; each failure is contained
    pub async fn create_subtasks(&self, analysis: &FeatureAnalysis) -> Vec<TaskOutput> {
        let mut created = Vec::new();
        for kind in TaskKind::ALL {
            debug!(kind = kind.name(), "create_subtasks: creating task");
            match self.execute(plans::task_plan(kind, analysis)).await {
                Ok(run) => {
                    let task: TaskOutput = self.decode_output(&run);
                    info!(kind = kind.name(), task_id = %task.task_id, "create_subtasks: task created");
                    created.push(task);
                }
                Err(e) => {
                    warn!(kind = kind.name(), error = %e, "create_subtasks: task creation failed");
                }
            }
        }
        created
    }

    /// Fetch and unwrap the double-encoded comment list for an issue
    pub async fn fetch_comments(&self, issue_id: &str) -> Result<Vec<Comment>> {
        debug!(%issue_id, "fetch_comments: called");
        let run = self.execute(plans::list_comments_plan(issue_id)).await?;
        let output: CommentsListOutput = self.decode_output(&run);
        Ok(output.decode_comments())
    }

    /// Post a new comment on an issue
    pub async fn create_comment(&self, issue_id: &str, title: Option<&str>, body: &str) -> Result<CommentOutput> {
        debug!(%issue_id, "create_comment: called");
        let run = self.execute(plans::create_comment_plan(issue_id, title, body)).await?;
        Ok(self.decode_output(&run))
    }

    /// Refine an issue from a valid comment
    pub async fn update_issue_from_comment(&self, issue_id: &str, comment: &Comment) -> Result<CommentOutput> {
        debug!(%issue_id, comment_id = %comment.id, "update_issue_from_comment: called");
        let run = self.execute(plans::update_issue_plan(issue_id, comment)).await?;
        Ok(self.decode_output(&run))
    }

    /// Reply to an invalid comment with the reviewer's justification
    pub async fn post_feedback_comment(&self, issue_id: &str, comment: &Comment, feedback: &str) -> Result<CommentOutput> {
        debug!(%issue_id, comment_id = %comment.id, "post_feedback_comment: called");
        let run = self.execute(plans::feedback_comment_plan(issue_id, comment, feedback)).await?;
        Ok(self.decode_output(&run))
    }

    /// Run the full workflow: research, save, PRD, issue, tasks, triage
    ///
    /// Research escalates; every downstream integration is contained.
    pub async fn run(&self, request: &FeatureRequest) -> Result<WorkflowOutcome> {
        info!(feature = %request.name, "run: workflow started");

        let analysis = self.research(request).await?;
        let analysis_file = self.save_analysis(&analysis)?;

        let page_id = match self.create_prd_page(&analysis).await {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(error = %e, "run: PRD creation failed, continuing");
                None
            }
        };

        let issue = match self.create_issue(&analysis).await {
            Ok(issue) => Some(issue),
            Err(e) => {
                warn!(error = %e, "run: issue creation failed, continuing");
                None
            }
        };

        let tasks = if issue.is_some() {
            self.create_subtasks(&analysis).await
        } else {
            Vec::new()
        };

        if let Some(issue) = &issue {
            if let Err(e) = triage::monitor_comments(self, &self.prompter, &issue.issue_id).await {
                warn!(error = %e, "run: comment monitoring failed, continuing");
            }
        }

        info!(feature = %analysis.feature_name, "run: workflow complete");
        Ok(WorkflowOutcome {
            analysis,
            analysis_file,
            page_id,
            issue_id: issue.map(|i| i.issue_id),
            tasks,
        })
    }

    /// Background entry point for the HTTP variant
    ///
    /// Advances the session through its progress checkpoints. The session
    /// fails only when the core research step raises; auxiliary
    /// integration failures surface as log lines inside `run`.
    pub async fn run_research_session(&self, sessions: SessionStore, session_id: String, request: FeatureRequest) {
        info!(%session_id, feature = %request.name, "run_research_session: called");
        sessions.checkpoint(&session_id, SessionStatus::SettingUp, 10);

        sessions.checkpoint(&session_id, SessionStatus::Researching, 30);
        let analysis = match self.research(&request).await {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!(%session_id, error = %e, "run_research_session: research failed");
                sessions.fail(&session_id, e.to_string());
                return;
            }
        };

        if let Err(e) = self.save_analysis(&analysis) {
            warn!(%session_id, error = %e, "run_research_session: failed to save analysis artifact");
        }

        sessions.checkpoint(&session_id, SessionStatus::CreatingPrd, 60);
        let page_id = match self.create_prd_page(&analysis).await {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(%session_id, error = %e, "run_research_session: PRD creation failed, continuing");
                None
            }
        };

        sessions.checkpoint(&session_id, SessionStatus::CreatingIssue, 80);
        let issue_id = match self.create_issue(&analysis).await {
            Ok(issue) => Some(issue.issue_id),
            Err(e) => {
                warn!(%session_id, error = %e, "run_research_session: issue creation failed, continuing");
                None
            }
        };

        if issue_id.is_some() {
            self.create_subtasks(&analysis).await;
        }

        let result = serde_json::json!({
            "feature_name": analysis.feature_name,
            "analysis": analysis,
            "notion_page_id": page_id,
            "linear_issue_id": issue_id,
        });
        sessions.complete(&session_id, result);
        info!(%session_id, "run_research_session: workflow completed");
    }
}
