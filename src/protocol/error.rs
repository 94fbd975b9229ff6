//! Error types for A2A protocol operations

use thiserror::Error;

/// Main error type for A2A protocol operations
#[derive(Debug, Error)]
pub enum A2AError {
    /// Transport-level error (network, connection, etc.)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Protocol-level error (invalid message format, unexpected response, etc.)
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The remote agent answered with a JSON-RPC error object
    #[error("JSON-RPC error {code}: {message}")]
    JsonRpc { code: i64, message: String },

    /// Validation error (invalid request or response)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Authentication or authorization error
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timeout error
    #[error("Request timeout")]
    Timeout,

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Agent discovery or the request carrying the message failed
    #[error("Agent unreachable at {agent_url}: {reason}")]
    AgentUnreachable { agent_url: String, reason: String },

    /// The remote agent failed while its response was being consumed
    #[error("Agent error: {0}")]
    AgentError(String),

    /// Session store failure
    #[error("Session store error: {0}")]
    Session(String),

    /// Generic error with custom message
    #[error("{0}")]
    Other(String),
}

impl A2AError {
    /// Whether the error happened before the remote agent produced anything
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            A2AError::Transport(_)
                | A2AError::Timeout
                | A2AError::InvalidUrl(_)
                | A2AError::AgentUnreachable { .. }
        )
    }
}

/// Result type alias for A2A operations
pub type A2AResult<T> = Result<T, A2AError>;

impl From<reqwest::Error> for A2AError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            A2AError::Timeout
        } else if err.is_connect() {
            A2AError::Transport(format!("Connection error: {}", err))
        } else {
            A2AError::Transport(err.to_string())
        }
    }
}

impl From<&str> for A2AError {
    fn from(s: &str) -> Self {
        A2AError::Other(s.to_string())
    }
}

impl From<String> for A2AError {
    fn from(s: String) -> Self {
        A2AError::Other(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connectivity_classification() {
        assert!(A2AError::Timeout.is_connectivity());
        assert!(A2AError::Transport("refused".into()).is_connectivity());
        assert!(!A2AError::JsonRpc {
            code: -32603,
            message: "boom".into()
        }
        .is_connectivity());
        assert!(!A2AError::AgentError("mid-stream".into()).is_connectivity());
    }

    #[test]
    fn test_json_rpc_display() {
        let err = A2AError::JsonRpc {
            code: -32601,
            message: "Method not found".into(),
        };
        assert_eq!(err.to_string(), "JSON-RPC error -32601: Method not found");
    }
}
