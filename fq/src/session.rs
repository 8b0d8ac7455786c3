//! In-memory research session tracking
//!
//! Sessions are created at request time and mutated only by the background
//! workflow task that owns them; API callers read them. The map is
//! append-only with no eviction, so a session lives as long as the
//! process.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;
use uuid::Uuid;

/// Lifecycle of a research session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Initializing,
    SettingUp,
    Researching,
    CreatingPrd,
    CreatingIssue,
    Completed,
    Failed,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Initializing => "initializing",
            Self::SettingUp => "setting_up",
            Self::Researching => "researching",
            Self::CreatingPrd => "creating_prd",
            Self::CreatingIssue => "creating_issue",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// One research session's observable state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    pub status: SessionStatus,

    /// Progress percentage (0-100)
    pub progress: u8,

    /// Final result payload, set only on completion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    /// Error text, set only when the core research step fails
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Shared session map keyed by session id
///
/// Each session id is written by exactly one background task, so entries
/// never race; the lock only guards the map structure itself.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new session and return its id
    pub fn create(&self) -> String {
        let id = Uuid::new_v4().to_string();
        debug!(session_id = %id, "create: new session");
        if let Ok(mut map) = self.inner.write() {
            map.insert(id.clone(), Session::default());
        }
        id
    }

    /// Read a session's current state
    pub fn get(&self, id: &str) -> Option<Session> {
        self.inner.read().ok()?.get(id).cloned()
    }

    /// Advance a session's status checkpoint
    pub fn checkpoint(&self, id: &str, status: SessionStatus, progress: u8) {
        debug!(session_id = %id, %status, progress, "checkpoint: called");
        if let Ok(mut map) = self.inner.write() {
            if let Some(session) = map.get_mut(id) {
                session.status = status;
                session.progress = progress;
            }
        }
    }

    /// Mark a session completed with its result payload
    pub fn complete(&self, id: &str, result: Value) {
        debug!(session_id = %id, "complete: called");
        if let Ok(mut map) = self.inner.write() {
            if let Some(session) = map.get_mut(id) {
                session.status = SessionStatus::Completed;
                session.progress = 100;
                session.result = Some(result);
            }
        }
    }

    /// Mark a session failed with the captured error text
    pub fn fail(&self, id: &str, error: String) {
        debug!(session_id = %id, %error, "fail: called");
        if let Ok(mut map) = self.inner.write() {
            if let Some(session) = map.get_mut(id) {
                session.status = SessionStatus::Failed;
                session.error = Some(error);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_get() {
        let store = SessionStore::new();
        let id = store.create();

        let session = store.get(&id).unwrap();
        assert_eq!(session.status, SessionStatus::Initializing);
        assert_eq!(session.progress, 0);
        assert!(session.result.is_none());
    }

    #[test]
    fn test_checkpoint_progression() {
        let store = SessionStore::new();
        let id = store.create();

        store.checkpoint(&id, SessionStatus::Researching, 30);
        let session = store.get(&id).unwrap();
        assert_eq!(session.status, SessionStatus::Researching);
        assert_eq!(session.progress, 30);
    }

    #[test]
    fn test_complete_sets_result() {
        let store = SessionStore::new();
        let id = store.create();

        store.complete(&id, serde_json::json!({"feature_name": "x"}));
        let session = store.get(&id).unwrap();
        assert_eq!(session.status, SessionStatus::Completed);
        assert_eq!(session.progress, 100);
        assert_eq!(session.result.unwrap()["feature_name"], "x");
    }

    #[test]
    fn test_fail_keeps_progress() {
        let store = SessionStore::new();
        let id = store.create();
        store.checkpoint(&id, SessionStatus::Researching, 30);

        store.fail(&id, "research failed".to_string());
        let session = store.get(&id).unwrap();
        assert_eq!(session.status, SessionStatus::Failed);
        assert_eq!(session.error.as_deref(), Some("research failed"));
        assert_eq!(session.progress, 30);
    }

    #[test]
    fn test_unknown_session_is_none() {
        let store = SessionStore::new();
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_value(SessionStatus::CreatingPrd).unwrap();
        assert_eq!(json, "creating_prd");
    }
}
