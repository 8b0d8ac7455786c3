//! Executor error types

use thiserror::Error;

/// Errors that can occur while talking to a plan executor
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExecutorError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            ExecutorError::ApiError { status, .. } => *status >= 500 || *status == 429,
            ExecutorError::Network(_) => true,
            ExecutorError::InvalidResponse(_) => false,
            ExecutorError::Json(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_retryable() {
        // 5xx and 429 should be retryable
        assert!(
            ExecutorError::ApiError {
                status: 500,
                message: "Server error".to_string()
            }
            .is_retryable()
        );
        assert!(
            ExecutorError::ApiError {
                status: 429,
                message: "Too many requests".to_string()
            }
            .is_retryable()
        );

        // 4xx should not be retryable
        assert!(
            !ExecutorError::ApiError {
                status: 400,
                message: "Bad request".to_string()
            }
            .is_retryable()
        );

        // Malformed payloads should not be retryable
        assert!(!ExecutorError::InvalidResponse("Bad JSON".to_string()).is_retryable());
    }
}
