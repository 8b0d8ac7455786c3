//! Output schemas for the external tool integrations
//!
//! Each plan declares one of these as the structured type its final output
//! must conform to. Executors are known to sometimes hand back the
//! serialized form as a plain string instead, so everything here defaults
//! and callers decode defensively (see the workflow runner).

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Output of the document-store page creation plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageOutput {
    /// Id of the created page
    pub page_id: String,
}

/// Output of a single tracker task creation plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskOutput {
    pub task_id: String,
    pub title: String,
    pub description: String,
}

/// Output of the tracker issue creation plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueOutput {
    pub issue_id: String,
    pub title: String,
    pub description: String,
    pub tasks: Vec<TaskOutput>,
}

/// Output of a comment create/update plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentOutput {
    pub comment_id: String,
    pub content: String,
}

/// One element of a list-comments response content array
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentItem {
    pub text: String,
}

/// Raw output of the list-comments plan
///
/// The tracker tool does not return comments directly: `content[0].text`
/// holds the comment array as a JSON-encoded string that must be unwrapped
/// a second time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentsListOutput {
    pub content: Vec<ContentItem>,
}

/// Author of a tracker comment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentAuthor {
    pub name: String,
}

/// A single comment on a tracker issue
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Comment {
    pub id: String,
    pub body: String,
    pub author: CommentAuthor,
}

impl CommentsListOutput {
    /// Unwrap the double-encoded comment list
    ///
    /// Decode failure degrades to an empty list with a logged warning;
    /// the comment sub-workflow is best-effort.
    pub fn decode_comments(&self) -> Vec<Comment> {
        let Some(item) = self.content.first() else {
            return Vec::new();
        };

        match serde_json::from_str::<Vec<Comment>>(&item.text) {
            Ok(comments) => comments,
            Err(e) => {
                warn!(error = %e, raw = %item.text, "decode_comments: inner payload is not a comment array");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_double_encoded_comments() {
        let output = CommentsListOutput {
            content: vec![ContentItem {
                text: r#"[{"id":"c1","body":"ok","author":{"name":"Bo"}}]"#.to_string(),
            }],
        };

        let comments = output.decode_comments();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].body, "ok");
        assert_eq!(comments[0].author.name, "Bo");
    }

    #[test]
    fn test_decode_empty_content() {
        let output = CommentsListOutput::default();
        assert!(output.decode_comments().is_empty());
    }

    #[test]
    fn test_decode_malformed_inner_payload() {
        let output = CommentsListOutput {
            content: vec![ContentItem {
                text: "not json at all".to_string(),
            }],
        };
        assert!(output.decode_comments().is_empty());
    }

    #[test]
    fn test_issue_output_defaults() {
        let issue: IssueOutput = serde_json::from_str(r#"{"issue_id": "LIN-42"}"#).unwrap();
        assert_eq!(issue.issue_id, "LIN-42");
        assert!(issue.tasks.is_empty());
    }
}
