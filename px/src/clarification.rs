//! Clarification types
//!
//! A Clarification is a typed, blocking request for external input raised
//! by the executor against a specific step of a specific PlanRun. Its
//! identity is (run, step, category, ordinal); the executor assigns a
//! unique id covering that tuple.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Category-specific payload of a clarification
///
/// The five known categories each carry only their relevant fields. An
/// unrecognized category deserializes to [`ClarificationKind::Unrecognized`]
/// so that callers can fall back to free-text resolution instead of
/// aborting when the protocol surface grows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum ClarificationKind {
    /// An out-of-band action (e.g. an OAuth flow) must be completed
    /// before execution can continue. No value is returned; resolution
    /// is a ready signal only.
    Action {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        action_url: Option<String>,
    },

    /// A free-text value is required
    Input {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        argument_name: Option<String>,
    },

    /// One of an ordered list of options must be chosen
    MultipleChoice { options: Vec<String> },

    /// A proposed value must be confirmed. Confirmation resolves with
    /// boolean true; anything else is a rejection reported back to the
    /// executor as an error, not a value.
    ValueConfirmation { value_to_confirm: Value },

    /// Executor-defined payload rendered for human inspection; the
    /// resolution is free text
    Custom {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        custom_data: Option<Value>,
    },

    /// Category this client does not know about
    #[serde(other)]
    Unrecognized,
}

impl ClarificationKind {
    /// Category name as reported on the wire
    pub fn category(&self) -> &'static str {
        match self {
            Self::Action { .. } => "action",
            Self::Input { .. } => "input",
            Self::MultipleChoice { .. } => "multiple_choice",
            Self::ValueConfirmation { .. } => "value_confirmation",
            Self::Custom { .. } => "custom",
            Self::Unrecognized => "unrecognized",
        }
    }
}

/// A request for missing information raised mid-execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clarification {
    /// Executor-assigned id, unique per (run, step, category, ordinal)
    pub id: Uuid,

    /// Index into the originating plan's steps
    pub step: usize,

    /// Human-readable prompt text
    pub user_guidance: String,

    /// Whether this clarification has already been resolved
    #[serde(default)]
    pub resolved: bool,

    /// Category and category-specific fields
    #[serde(flatten)]
    pub kind: ClarificationKind,
}

impl Clarification {
    /// Create an unresolved clarification (primarily for tests and mocks)
    pub fn new(step: usize, user_guidance: impl Into<String>, kind: ClarificationKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            step,
            user_guidance: user_guidance.into(),
            resolved: false,
            kind,
        }
    }
}
