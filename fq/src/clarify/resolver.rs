//! Clarification resolution loop
//!
//! Drains a paused plan run: snapshot the outstanding clarification set,
//! resolve every entry through the prompter, then issue exactly one resume.
//! Resuming may surface a fresh outstanding set, so the loop re-enters
//! until the run leaves the need-clarification state. Resolving a
//! clarification never implicitly resumes the run.

use eyre::Result;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use planexec::{Clarification, ClarificationKind, PlanExecutor, PlanRun, RunState};

use crate::clarify::prompter::Prompter;

/// Drives outstanding clarifications to resolution
pub struct ResolutionLoop {
    executor: Arc<dyn PlanExecutor>,
    prompter: Arc<dyn Prompter>,
}

impl ResolutionLoop {
    pub fn new(executor: Arc<dyn PlanExecutor>, prompter: Arc<dyn Prompter>) -> Self {
        Self { executor, prompter }
    }

    /// Resolve clarifications and resume until the run settles
    ///
    /// Returns whatever state the executor reaches after all resolutions;
    /// callers must treat non-Complete terminal states as failure.
    pub async fn drain(&self, mut run: PlanRun) -> Result<PlanRun> {
        debug!(run_id = %run.id, "drain: called");

        while run.state == RunState::NeedClarification {
            let outstanding = run.outstanding_clarifications();
            info!(
                run_id = %run.id,
                count = outstanding.len(),
                "drain: run paused, resolving clarifications"
            );
            self.prompter
                .show(&format!("Plan run paused - {} clarification(s) to resolve", outstanding.len()));

            for (i, clarification) in outstanding.iter().enumerate() {
                debug!(
                    run_id = %run.id,
                    category = clarification.kind.category(),
                    step = clarification.step,
                    "drain: resolving clarification"
                );
                self.prompter.show(&format!(
                    "--- Clarification {}/{} (step {}, {}) ---",
                    i + 1,
                    outstanding.len(),
                    clarification.step,
                    clarification.kind.category()
                ));
                run = self.resolve_one(clarification, &run).await?;
            }

            if run.state == RunState::NeedClarification {
                debug!(run_id = %run.id, "drain: all resolved, resuming run");
                self.prompter.show("Resuming plan run...");
                run = self.executor.resume(&run).await?;
            }
        }

        debug!(run_id = %run.id, state = %run.state, "drain: run settled");
        Ok(run)
    }

    /// Resolve a single clarification by category dispatch
    async fn resolve_one(&self, clarification: &Clarification, run: &PlanRun) -> Result<PlanRun> {
        match &clarification.kind {
            ClarificationKind::Action { action_url } => {
                self.prompter
                    .show(&format!("ACTION REQUIRED: {}", clarification.user_guidance));
                if let Some(url) = action_url {
                    self.prompter.show(&format!("Action URL: {}", url));
                }
                self.prompter
                    .wait_for_ready("Please complete the required action, then continue.")?;
                Ok(self.executor.wait_for_ready(run).await?)
            }

            ClarificationKind::Input { argument_name } => {
                self.prompter
                    .show(&format!("INPUT NEEDED: {}", clarification.user_guidance));
                if let Some(name) = argument_name {
                    self.prompter.show(&format!("Parameter: {}", name));
                }
                let value = self.prompter.ask_text("Please provide the required input:")?;
                Ok(self
                    .executor
                    .resolve_clarification(clarification, Value::String(value), run)
                    .await?)
            }

            ClarificationKind::MultipleChoice { options } => {
                self.prompter
                    .show(&format!("CHOOSE AN OPTION: {}", clarification.user_guidance));
                if options.is_empty() {
                    // No options reported; fall back to free text
                    let value = self.prompter.ask_text("Your choice:")?;
                    return Ok(self
                        .executor
                        .resolve_clarification(clarification, Value::String(value), run)
                        .await?);
                }

                for (i, option) in options.iter().enumerate() {
                    self.prompter.show(&format!("{}. {}", i + 1, option));
                }

                let selected = loop {
                    let answer = self
                        .prompter
                        .ask_text(&format!("Please select an option (1-{}):", options.len()))?;
                    match answer.trim().parse::<usize>() {
                        Ok(choice) if (1..=options.len()).contains(&choice) => break options[choice - 1].clone(),
                        Ok(_) => self
                            .prompter
                            .show(&format!("Please enter a number between 1 and {}", options.len())),
                        Err(_) => self.prompter.show("Please enter a valid number"),
                    }
                };

                Ok(self
                    .executor
                    .resolve_clarification(clarification, Value::String(selected), run)
                    .await?)
            }

            ClarificationKind::ValueConfirmation { value_to_confirm } => {
                self.prompter
                    .show(&format!("CONFIRM VALUE: {}", clarification.user_guidance));
                self.prompter.show(&format!("Value to confirm: {}", value_to_confirm));

                if self.prompter.ask_yes_no("Is this correct?")? {
                    Ok(self
                        .executor
                        .resolve_clarification(clarification, Value::Bool(true), run)
                        .await?)
                } else {
                    // Rejection is an error signal to the executor, not a value
                    warn!(
                        run_id = %run.id,
                        step = clarification.step,
                        "resolve_one: value confirmation rejected"
                    );
                    Ok(self
                        .executor
                        .reject_clarification(clarification, "User rejected the value", run)
                        .await?)
                }
            }

            ClarificationKind::Custom { custom_data } => {
                self.prompter
                    .show(&format!("CUSTOM CLARIFICATION: {}", clarification.user_guidance));
                if let Some(data) = custom_data {
                    self.prompter
                        .show(&format!("Additional data: {}", serde_json::to_string_pretty(data)?));
                }
                let value = self.prompter.ask_text("Please provide your response:")?;
                Ok(self
                    .executor
                    .resolve_clarification(clarification, Value::String(value), run)
                    .await?)
            }

            ClarificationKind::Unrecognized => {
                warn!(
                    run_id = %run.id,
                    step = clarification.step,
                    "resolve_one: unrecognized clarification category, falling back to free text"
                );
                self.prompter
                    .show(&format!("CLARIFICATION: {}", clarification.user_guidance));
                let value = self.prompter.ask_text("Please provide your response:")?;
                Ok(self
                    .executor
                    .resolve_clarification(clarification, Value::String(value), run)
                    .await?)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clarify::prompter::ScriptedPrompter;
    use planexec::mock::{RecordedCall, ScriptedExecutor};
    use planexec::run::RunOutputs;

    fn paused_run(id: &str, clarifications: Vec<Clarification>) -> PlanRun {
        PlanRun {
            id: id.to_string(),
            plan_name: "test".to_string(),
            state: RunState::NeedClarification,
            outputs: RunOutputs::default(),
            clarifications,
        }
    }

    fn complete_run(id: &str) -> PlanRun {
        PlanRun {
            id: id.to_string(),
            plan_name: "test".to_string(),
            state: RunState::Complete,
            outputs: RunOutputs::default(),
            clarifications: vec![],
        }
    }

    fn failed_run(id: &str) -> PlanRun {
        PlanRun {
            id: id.to_string(),
            plan_name: "test".to_string(),
            state: RunState::Failed,
            outputs: RunOutputs::default(),
            clarifications: vec![],
        }
    }

    #[tokio::test]
    async fn test_input_clarification_resolves_and_resumes_once() {
        let executor = Arc::new(ScriptedExecutor::new());
        executor.push_run(complete_run("run-1"));
        let prompter = Arc::new(ScriptedPrompter::with_answers(&["the answer"]));
        let resolver = ResolutionLoop::new(executor.clone(), prompter);

        let clarification = Clarification::new(
            0,
            "what value?",
            ClarificationKind::Input {
                argument_name: Some("query".to_string()),
            },
        );
        let run = paused_run("run-1", vec![clarification.clone()]);

        let settled = resolver.drain(run).await.unwrap();
        assert_eq!(settled.state, RunState::Complete);

        let calls = executor.calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(&calls[0], RecordedCall::Resolve { value, .. } if value == "the answer"));
        assert!(matches!(&calls[1], RecordedCall::Resume { .. }));
    }

    #[tokio::test]
    async fn test_multiple_choice_reprompts_until_valid() {
        let executor = Arc::new(ScriptedExecutor::new());
        executor.push_run(complete_run("run-1"));
        // Out-of-range, non-numeric, then valid
        let prompter = Arc::new(ScriptedPrompter::with_answers(&["5", "x", "2"]));
        let resolver = ResolutionLoop::new(executor.clone(), prompter);

        let clarification = Clarification::new(
            1,
            "which one?",
            ClarificationKind::MultipleChoice {
                options: vec!["A".to_string(), "B".to_string(), "C".to_string()],
            },
        );
        let run = paused_run("run-1", vec![clarification]);

        let settled = resolver.drain(run).await.unwrap();
        assert_eq!(settled.state, RunState::Complete);

        let calls = executor.calls();
        assert!(matches!(&calls[0], RecordedCall::Resolve { value, .. } if value == "B"));
    }

    #[tokio::test]
    async fn test_value_confirmation_rejection_reports_error() {
        let executor = Arc::new(ScriptedExecutor::new());
        executor.push_run(failed_run("run-1"));
        let prompter = Arc::new(ScriptedPrompter::with_answers(&["n"]));
        let resolver = ResolutionLoop::new(executor.clone(), prompter);

        let clarification = Clarification::new(
            0,
            "use this team?",
            ClarificationKind::ValueConfirmation {
                value_to_confirm: serde_json::json!("Platform"),
            },
        );
        let run = paused_run("run-1", vec![clarification.clone()]);

        let settled = resolver.drain(run).await.unwrap();
        assert_eq!(settled.state, RunState::Failed);

        let calls = executor.calls();
        // Error report, never a boolean false resolution
        assert!(matches!(
            &calls[0],
            RecordedCall::Reject { reason, .. } if reason == "User rejected the value"
        ));
        assert!(!calls.iter().any(|c| matches!(c, RecordedCall::Resolve { .. })));
    }

    #[tokio::test]
    async fn test_loop_reenters_on_fresh_clarifications() {
        let executor = Arc::new(ScriptedExecutor::new());
        let second_pass = paused_run(
            "run-1",
            vec![Clarification::new(
                2,
                "one more thing",
                ClarificationKind::Input { argument_name: None },
            )],
        );
        executor.push_run(second_pass);
        executor.push_run(complete_run("run-1"));

        let prompter = Arc::new(ScriptedPrompter::with_answers(&["first", "second"]));
        let resolver = ResolutionLoop::new(executor.clone(), prompter);

        let run = paused_run(
            "run-1",
            vec![Clarification::new(
                0,
                "first thing",
                ClarificationKind::Input { argument_name: None },
            )],
        );

        let settled = resolver.drain(run).await.unwrap();
        assert_eq!(settled.state, RunState::Complete);

        let resumes = executor
            .calls()
            .iter()
            .filter(|c| matches!(c, RecordedCall::Resume { .. }))
            .count();
        assert_eq!(resumes, 2);
    }

    #[tokio::test]
    async fn test_resolved_clarifications_not_represented() {
        // One already-resolved entry alongside an outstanding one: only the
        // outstanding clarification may be resolved again
        let executor = Arc::new(ScriptedExecutor::new());
        executor.push_run(complete_run("run-1"));
        let prompter = Arc::new(ScriptedPrompter::with_answers(&["only answer"]));
        let resolver = ResolutionLoop::new(executor.clone(), prompter);

        let mut settled_clarification =
            Clarification::new(0, "already done", ClarificationKind::Input { argument_name: None });
        settled_clarification.resolved = true;
        let outstanding = Clarification::new(1, "still open", ClarificationKind::Input { argument_name: None });

        let run = paused_run("run-1", vec![settled_clarification, outstanding.clone()]);
        resolver.drain(run).await.unwrap();

        let resolves: Vec<_> = executor
            .calls()
            .into_iter()
            .filter(|c| matches!(c, RecordedCall::Resolve { .. }))
            .collect();
        assert_eq!(resolves.len(), 1);
        assert!(matches!(
            &resolves[0],
            RecordedCall::Resolve { clarification_id, .. } if *clarification_id == outstanding.id
        ));
    }

    #[tokio::test]
    async fn test_action_clarification_waits_for_ready() {
        let executor = Arc::new(ScriptedExecutor::new());
        executor.push_run(complete_run("run-1"));
        let prompter = Arc::new(ScriptedPrompter::new());
        let resolver = ResolutionLoop::new(executor.clone(), prompter.clone());

        let clarification = Clarification::new(
            0,
            "authorize the integration",
            ClarificationKind::Action {
                action_url: Some("https://auth.example/flow".to_string()),
            },
        );
        let run = paused_run("run-1", vec![clarification]);

        let settled = resolver.drain(run).await.unwrap();
        assert_eq!(settled.state, RunState::Complete);

        let calls = executor.calls();
        assert!(matches!(&calls[0], RecordedCall::WaitForReady { .. }));
        assert!(prompter.shown().iter().any(|m| m.contains("https://auth.example/flow")));
    }

    #[tokio::test]
    async fn test_custom_clarification_shows_data_and_resolves_free_text() {
        let executor = Arc::new(ScriptedExecutor::new());
        executor.push_run(complete_run("run-1"));
        let prompter = Arc::new(ScriptedPrompter::with_answers(&["use the staging key"]));
        let resolver = ResolutionLoop::new(executor.clone(), prompter.clone());

        let clarification = Clarification::new(
            0,
            "tool needs extra context",
            ClarificationKind::Custom {
                custom_data: Some(serde_json::json!({"environment": "staging"})),
            },
        );
        let run = paused_run("run-1", vec![clarification]);

        let settled = resolver.drain(run).await.unwrap();
        assert_eq!(settled.state, RunState::Complete);

        // The payload is rendered to the user before the free-text prompt
        assert!(prompter.shown().iter().any(|m| m.contains("staging")));
        assert!(matches!(
            &executor.calls()[0],
            RecordedCall::Resolve { value, .. } if value == "use the staging key"
        ));
    }

    #[tokio::test]
    async fn test_unrecognized_category_falls_back_to_input() {
        let executor = Arc::new(ScriptedExecutor::new());
        executor.push_run(complete_run("run-1"));
        let prompter = Arc::new(ScriptedPrompter::with_answers(&["fallback answer"]));
        let resolver = ResolutionLoop::new(executor.clone(), prompter);

        let clarification = Clarification::new(0, "please advise", ClarificationKind::Unrecognized);
        let run = paused_run("run-1", vec![clarification]);

        let settled = resolver.drain(run).await.unwrap();
        assert_eq!(settled.state, RunState::Complete);
        assert!(matches!(
            &executor.calls()[0],
            RecordedCall::Resolve { value, .. } if value == "fallback answer"
        ));
    }
}
