use std::time::Duration;

use thiserror::Error;

/// All errors that can occur when using the RoEx SDK.
#[derive(Error, Debug)]
pub enum RoexError {
    /// The API key is missing or was rejected (HTTP 401).
    #[error("authentication failed: {message}")]
    Authentication { message: String },

    /// The key is valid but not allowed to use this endpoint (HTTP 403).
    #[error("permission denied: {message}")]
    PermissionDenied { message: String },

    /// The endpoint or task was not found (HTTP 404).
    #[error("not found: {message}")]
    NotFound { message: String },

    /// The request was rate-limited (HTTP 429).
    #[error("rate limited (retry after {retry_after:?}s): {message}")]
    RateLimit {
        message: String,
        retry_after: Option<f64>,
    },

    /// Any other non-2xx response, with the status code and parsed body if it was JSON.
    #[error("API error {status_code}: {message}")]
    Api {
        status_code: u16,
        message: String,
        body: Option<serde_json::Value>,
    },

    /// A transport-level HTTP error from reqwest.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered 2xx but flagged an error or left out required data.
    #[error("service error: {message}")]
    Service { message: String },

    /// Polling gave up after exhausting its attempt budget.
    #[error("task did not complete after {attempts} attempts ({budget:?})")]
    Timeout { attempts: u32, budget: Duration },

    /// The task reached a terminal failed status.
    #[error("task {task_id} failed with status {status}")]
    TaskFailed { task_id: String, status: String },

    /// Malformed local input, e.g. an unsupported file extension or an
    /// out-of-range effect parameter.
    #[error("invalid input: {0}")]
    Validation(String),

    /// An I/O error while reading an upload or writing a download.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A response body could not be mapped onto the expected model.
    #[error("unexpected response body: {0}")]
    Json(#[from] serde_json::Error),
}

impl RoexError {
    /// Whether a failed status check may succeed if simply tried again.
    ///
    /// Auth failures and local mistakes never heal on their own; everything
    /// the server or network reported is worth another attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            RoexError::Http(_)
            | RoexError::RateLimit { .. }
            | RoexError::NotFound { .. }
            | RoexError::Api { .. }
            | RoexError::Json(_) => true,
            RoexError::Authentication { .. }
            | RoexError::PermissionDenied { .. }
            | RoexError::Service { .. }
            | RoexError::Timeout { .. }
            | RoexError::TaskFailed { .. }
            | RoexError::Validation(_)
            | RoexError::Io(_) => false,
        }
    }

    pub(crate) fn service(message: impl Into<String>) -> Self {
        RoexError::Service {
            message: message.into(),
        }
    }
}

/// A convenience alias for `Result<T, RoexError>`.
pub type Result<T> = std::result::Result<T, RoexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_are_not_transient() {
        let err = RoexError::Authentication {
            message: "bad key".into(),
        };
        assert!(!err.is_transient());

        let err = RoexError::PermissionDenied {
            message: "nope".into(),
        };
        assert!(!err.is_transient());
    }

    #[test]
    fn server_errors_are_transient() {
        let err = RoexError::Api {
            status_code: 503,
            message: "unavailable".into(),
            body: None,
        };
        assert!(err.is_transient());
    }

    #[test]
    fn timeout_message_names_attempts() {
        let err = RoexError::Timeout {
            attempts: 4,
            budget: Duration::from_secs(15),
        };
        assert_eq!(err.to_string(), "task did not complete after 4 attempts (15s)");
    }
}
