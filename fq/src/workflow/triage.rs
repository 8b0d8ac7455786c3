//! Comment triage
//!
//! Single pass over fetched comments with a binary validity judgment per
//! comment. Valid comments refine the issue; invalid ones get a feedback
//! reply carrying the reviewer's justification. No retries, and the
//! decision is not persisted beyond the pass.

use eyre::Result;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::clarify::Prompter;
use crate::domain::Comment;
use crate::workflow::runner::WorkflowRunner;

/// Review each comment and act on the validity verdict
pub async fn process_comments(
    runner: &WorkflowRunner,
    prompter: &Arc<dyn Prompter>,
    issue_id: &str,
    comments: &[Comment],
) -> Result<()> {
    info!(%issue_id, count = comments.len(), "process_comments: called");

    for comment in comments {
        prompter.show(&format!("Comment from {}:", comment.author.name));
        prompter.show(&format!("  {}", comment.body));

        if prompter.ask_yes_no("Is this comment valid and actionable?")? {
            debug!(comment_id = %comment.id, "process_comments: comment accepted, refining issue");
            if let Err(e) = runner.update_issue_from_comment(issue_id, comment).await {
                warn!(comment_id = %comment.id, error = %e, "process_comments: issue update failed");
            }
        } else {
            let feedback = prompter.ask_text("Why is this comment not a valid blocker? Provide feedback:")?;
            if feedback.trim().is_empty() {
                debug!(comment_id = %comment.id, "process_comments: no feedback provided, skipping");
                continue;
            }
            debug!(comment_id = %comment.id, "process_comments: posting feedback reply");
            if let Err(e) = runner.post_feedback_comment(issue_id, comment, &feedback).await {
                warn!(comment_id = %comment.id, error = %e, "process_comments: feedback comment failed");
            }
        }
    }

    Ok(())
}

/// Prompt for and post a new comment; an empty body aborts with a warning
pub async fn create_comment_interactive(
    runner: &WorkflowRunner,
    prompter: &Arc<dyn Prompter>,
    issue_id: &str,
) -> Result<()> {
    let title = prompter.ask_text("Comment title (optional):")?;
    let body = prompter.ask_text("Comment content:")?;

    if body.trim().is_empty() {
        warn!(%issue_id, "create_comment_interactive: empty comment body, nothing posted");
        prompter.show("Comment content cannot be empty");
        return Ok(());
    }

    let title = (!title.trim().is_empty()).then_some(title);
    match runner.create_comment(issue_id, title.as_deref(), &body).await {
        Ok(output) => {
            info!(%issue_id, comment_id = %output.comment_id, "create_comment_interactive: comment created");
            prompter.show("New comment created successfully");
        }
        Err(e) => {
            warn!(%issue_id, error = %e, "create_comment_interactive: comment creation failed");
            prompter.show(&format!("Comment creation failed: {}", e));
        }
    }

    Ok(())
}

/// Fetch comments for an issue and offer the comment-management menu
pub async fn monitor_comments(runner: &WorkflowRunner, prompter: &Arc<dyn Prompter>, issue_id: &str) -> Result<()> {
    info!(%issue_id, "monitor_comments: called");

    let comments = runner.fetch_comments(issue_id).await?;
    if comments.is_empty() {
        prompter.show("No comments found for this issue");
        if prompter.ask_yes_no("Create a new comment?")? {
            create_comment_interactive(runner, prompter, issue_id).await?;
        }
        return Ok(());
    }

    prompter.show(&format!("Found {} comment(s)", comments.len()));
    prompter.show("Comment management options:");
    prompter.show("  1. Process existing comments");
    prompter.show("  2. Create a new comment");
    prompter.show("  3. Skip comment management");

    match prompter.ask_text("What would you like to do? (1/2/3):")?.trim() {
        "1" => process_comments(runner, prompter, issue_id, &comments).await?,
        "2" => create_comment_interactive(runner, prompter, issue_id).await?,
        "3" => prompter.show("Skipping comment management"),
        other => {
            debug!(choice = %other, "monitor_comments: invalid menu choice");
            prompter.show("Invalid choice, skipping comment management");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clarify::ScriptedPrompter;
    use crate::domain::CommentAuthor;
    use planexec::mock::{RecordedCall, ScriptedExecutor};
    use planexec::run::{FinalOutput, RunOutputs};
    use planexec::{PlanRun, RunState};
    use std::path::PathBuf;

    fn complete_run(value: serde_json::Value) -> PlanRun {
        PlanRun {
            id: "run-1".to_string(),
            plan_name: "scripted".to_string(),
            state: RunState::Complete,
            outputs: RunOutputs {
                step_outputs: vec![],
                final_output: Some(FinalOutput { value }),
            },
            clarifications: vec![],
        }
    }

    fn comment(id: &str, body: &str, author: &str) -> Comment {
        Comment {
            id: id.to_string(),
            body: body.to_string(),
            author: CommentAuthor {
                name: author.to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_valid_comment_updates_issue() {
        let executor = Arc::new(ScriptedExecutor::new());
        executor.push_run(complete_run(serde_json::json!({"comment_id": "u1"})));
        let prompter: Arc<dyn Prompter> = Arc::new(ScriptedPrompter::with_answers(&["y"]));
        let runner = WorkflowRunner::new(executor.clone(), prompter.clone(), PathBuf::from("."));

        let comments = vec![comment("c1", "needs rate limiting", "Bo")];
        process_comments(&runner, &prompter, "LIN-1", &comments).await.unwrap();

        // The update plan targets the update-issue tool, never create-comment
        let calls = executor.calls();
        assert!(matches!(
            &calls[0],
            RecordedCall::RunPlan { plan_name } if plan_name.contains("Update issue LIN-1")
        ));
    }

    #[tokio::test]
    async fn test_invalid_comment_posts_feedback() {
        let executor = Arc::new(ScriptedExecutor::new());
        executor.push_run(complete_run(serde_json::json!({"comment_id": "f1"})));
        let prompter: Arc<dyn Prompter> =
            Arc::new(ScriptedPrompter::with_answers(&["n", "out of scope for this release"]));
        let runner = WorkflowRunner::new(executor.clone(), prompter.clone(), PathBuf::from("."));

        let comments = vec![comment("c1", "add telepathy support", "Mo")];
        process_comments(&runner, &prompter, "LIN-1", &comments).await.unwrap();

        let calls = executor.calls();
        assert!(matches!(
            &calls[0],
            RecordedCall::RunPlan { plan_name } if plan_name.contains("feedback comment")
        ));
    }

    #[tokio::test]
    async fn test_invalid_comment_without_feedback_is_skipped() {
        let executor = Arc::new(ScriptedExecutor::new());
        let prompter: Arc<dyn Prompter> = Arc::new(ScriptedPrompter::with_answers(&["n", ""]));
        let runner = WorkflowRunner::new(executor.clone(), prompter.clone(), PathBuf::from("."));

        let comments = vec![comment("c1", "meh", "Jo")];
        process_comments(&runner, &prompter, "LIN-1", &comments).await.unwrap();
        assert!(executor.calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_comment_body_aborts_creation() {
        let executor = Arc::new(ScriptedExecutor::new());
        let prompter: Arc<dyn Prompter> = Arc::new(ScriptedPrompter::with_answers(&["a title", "   "]));
        let runner = WorkflowRunner::new(executor.clone(), prompter.clone(), PathBuf::from("."));

        create_comment_interactive(&runner, &prompter, "LIN-1").await.unwrap();
        assert!(executor.calls().is_empty());
    }
}
