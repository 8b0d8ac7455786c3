//! HTTP API surface
//!
//! One background tokio task per research request; the session map is the
//! only state shared across requests. Clarifications raised inside a
//! background task block that task, not the API process.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::FeatureRequest;
use crate::session::SessionStore;
use crate::workflow::runner::WorkflowRunner;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub runner: Arc<WorkflowRunner>,
    pub sessions: SessionStore,
}

/// API error mapped to a JSON failure envelope
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(serde_json::json!({
            "success": false,
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}

#[derive(Debug, Serialize)]
struct ResearchSessionResponse {
    session_id: String,
    status: String,
    progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommentRequest {
    issue_id: String,
    #[serde(default)]
    title: Option<String>,
    content: String,
}

/// Build the API router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/research", post(start_research))
        .route("/research/:id", get(research_status))
        .route("/comments", post(create_comment))
        .route("/comments/:issue_id", get(list_comments))
        .with_state(state)
}

/// Bind and serve the API
pub async fn serve(addr: SocketAddr, state: AppState) -> eyre::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "serve: API listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// GET / - describe the API
async fn root() -> Json<Value> {
    Json(serde_json::json!({
        "name": "FeatureQuest API",
        "endpoints": {
            "POST /research": "Start a research session for a feature request",
            "GET /research/{session_id}": "Get research session status",
            "POST /comments": "Create a comment on a tracker issue",
            "GET /comments/{issue_id}": "List comments for a tracker issue",
        }
    }))
}

/// POST /research - accept a feature request and run it in the background
async fn start_research(
    State(state): State<AppState>,
    Json(request): Json<FeatureRequest>,
) -> Json<ResearchSessionResponse> {
    let session_id = state.sessions.create();
    info!(%session_id, feature = %request.name, "start_research: session created");

    let runner = state.runner.clone();
    let sessions = state.sessions.clone();
    let id = session_id.clone();
    tokio::spawn(async move {
        runner.run_research_session(sessions, id, request).await;
    });

    Json(ResearchSessionResponse {
        session_id,
        status: "started".to_string(),
        progress: 0,
        result: None,
        error: None,
    })
}

/// GET /research/:id - poll a session
async fn research_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ResearchSessionResponse>, ApiError> {
    debug!(session_id = %id, "research_status: called");
    let session = state
        .sessions
        .get(&id)
        .ok_or_else(|| ApiError::NotFound("Research session not found".to_string()))?;

    Ok(Json(ResearchSessionResponse {
        session_id: id,
        status: session.status.to_string(),
        progress: session.progress,
        result: session.result,
        error: session.error,
    }))
}

/// POST /comments - create a comment on an issue
async fn create_comment(
    State(state): State<AppState>,
    Json(request): Json<CommentRequest>,
) -> Result<Json<Value>, ApiError> {
    debug!(issue_id = %request.issue_id, "create_comment: called");
    let output = state
        .runner
        .create_comment(&request.issue_id, request.title.as_deref(), &request.content)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to create comment: {e}")))?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Comment created successfully",
        "data": { "comment_id": output.comment_id },
    })))
}

/// GET /comments/:issue_id - list comments for an issue
async fn list_comments(
    State(state): State<AppState>,
    Path(issue_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    debug!(%issue_id, "list_comments: called");
    let comments = state
        .runner
        .fetch_comments(&issue_id)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to get comments: {e}")))?;

    Ok(Json(serde_json::json!({
        "issue_id": issue_id,
        "count": comments.len(),
        "comments": comments,
    })))
}
