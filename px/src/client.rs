//! HTTP client for a hosted plan executor service
//!
//! Implements the PlanExecutor trait against the executor's REST API with
//! retry/backoff for transient errors.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::clarification::Clarification;
use crate::error::ExecutorError;
use crate::executor::PlanExecutor;
use crate::plan::Plan;
use crate::run::PlanRun;

/// Maximum number of retries for transient errors
const MAX_RETRIES: u32 = 3;

/// Initial backoff delay for retries
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 429 | 500 | 502 | 503 | 504)
}

/// Client for a hosted plan executor
pub struct CloudExecutor {
    api_key: String,
    base_url: String,
    http: Client,
}

impl CloudExecutor {
    /// Create a new client
    ///
    /// `timeout` bounds each HTTP exchange, not plan execution: `run_plan`
    /// on the service side blocks until the run leaves the Running state,
    /// so the timeout should be generous.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Result<Self, ExecutorError> {
        let http = Client::builder().timeout(timeout).build().map_err(ExecutorError::Network)?;

        Ok(Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            http,
        })
    }

    /// POST a JSON body and decode the returned PlanRun, retrying
    /// transient failures with exponential backoff
    async fn post_run(&self, path: &str, body: &Value) -> Result<PlanRun, ExecutorError> {
        debug!(%path, "post_run: called");
        let url = format!("{}{}", self.base_url, path);

        let mut last_error = None;
        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                let backoff = INITIAL_BACKOFF_MS * 2u64.pow(attempt - 1);
                warn!(attempt, backoff_ms = backoff, "post_run: retrying after transient error");
                tokio::time::sleep(Duration::from_millis(backoff)).await;
            }

            let response = match self
                .http
                .post(url.clone())
                .bearer_auth(&self.api_key)
                .header("content-type", "application/json")
                .json(body)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    debug!(attempt, error = %e, "post_run: network error");
                    last_error = Some(ExecutorError::Network(e));
                    continue;
                }
            };

            let status = response.status().as_u16();

            if is_retryable_status(status) && attempt < MAX_RETRIES {
                let text = response.text().await.unwrap_or_default();
                debug!(attempt, status, "post_run: retryable error");
                last_error = Some(ExecutorError::ApiError { status, message: text });
                continue;
            }

            if !response.status().is_success() {
                debug!(status, "post_run: API error");
                let text = response.text().await.unwrap_or_default();
                return Err(ExecutorError::ApiError { status, message: text });
            }

            debug!(status, "post_run: success");
            let run: PlanRun = response.json().await?;
            return Ok(run);
        }

        Err(last_error.unwrap_or_else(|| ExecutorError::InvalidResponse("Max retries exceeded".to_string())))
    }
}

#[async_trait]
impl PlanExecutor for CloudExecutor {
    async fn run_plan(&self, plan: &Plan) -> Result<PlanRun, ExecutorError> {
        debug!(plan = %plan.name, steps = plan.steps.len(), "run_plan: called");
        let body = serde_json::to_value(plan)?;
        self.post_run("/v1/plan-runs", &body).await
    }

    async fn resolve_clarification(
        &self,
        clarification: &Clarification,
        value: Value,
        run: &PlanRun,
    ) -> Result<PlanRun, ExecutorError> {
        debug!(run_id = %run.id, clarification_id = %clarification.id, "resolve_clarification: called");
        let path = format!("/v1/plan-runs/{}/clarifications/{}/resolve", run.id, clarification.id);
        let body = serde_json::json!({ "value": value });
        self.post_run(&path, &body).await
    }

    async fn reject_clarification(
        &self,
        clarification: &Clarification,
        reason: &str,
        run: &PlanRun,
    ) -> Result<PlanRun, ExecutorError> {
        debug!(run_id = %run.id, clarification_id = %clarification.id, %reason, "reject_clarification: called");
        let path = format!("/v1/plan-runs/{}/clarifications/{}/error", run.id, clarification.id);
        let body = serde_json::json!({ "reason": reason });
        self.post_run(&path, &body).await
    }

    async fn resume(&self, run: &PlanRun) -> Result<PlanRun, ExecutorError> {
        debug!(run_id = %run.id, "resume: called");
        let path = format!("/v1/plan-runs/{}/resume", run.id);
        self.post_run(&path, &serde_json::json!({})).await
    }

    async fn wait_for_ready(&self, run: &PlanRun) -> Result<PlanRun, ExecutorError> {
        debug!(run_id = %run.id, "wait_for_ready: called");
        let path = format!("/v1/plan-runs/{}/wait-ready", run.id);
        self.post_run(&path, &serde_json::json!({})).await
    }
}
