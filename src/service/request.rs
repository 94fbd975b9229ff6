//! A2A service request types

use std::{collections::HashMap, time::Duration};

use crate::{layer::auth::AuthCredentials, protocol::operation::A2AOperation};

/// A request to the A2A service
///
/// This wraps an A2A operation with additional context needed for execution
#[derive(Debug, Clone)]
pub struct A2ARequest {
    /// The A2A operation to execute
    pub operation: A2AOperation,

    /// Request context (auth, timeouts, metadata)
    pub context: RequestContext,
}

impl A2ARequest {
    /// Create a new A2A request
    pub fn new(operation: A2AOperation, context: RequestContext) -> Self {
        Self { operation, context }
    }
}

/// Request context containing metadata and configuration
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// JSON-RPC endpoint advertised by the agent card
    ///
    /// `None` posts to the transport base URL.
    pub rpc_url: Option<String>,

    /// Authentication credentials (if any)
    pub auth: Option<AuthCredentials>,

    /// Request timeout
    pub timeout: Option<Duration>,

    /// Additional metadata headers
    pub metadata: HashMap<String, String>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route JSON-RPC calls to the given endpoint
    pub fn with_rpc_url(mut self, rpc_url: impl Into<String>) -> Self {
        self.rpc_url = Some(rpc_url.into());
        self
    }

    /// Set authentication credentials
    pub fn with_auth(mut self, auth: AuthCredentials) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Add a metadata header
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::message::Message;

    #[test]
    fn test_request_context_creation() {
        let context = RequestContext::new()
            .with_rpc_url("http://agents.local/rpc")
            .with_timeout(Duration::from_secs(60))
            .with_metadata("X-Trace", "abc");

        assert_eq!(context.rpc_url.as_deref(), Some("http://agents.local/rpc"));
        assert_eq!(context.timeout, Some(Duration::from_secs(60)));
        assert_eq!(context.metadata.get("X-Trace"), Some(&"abc".to_string()));
        assert!(context.auth.is_none());
    }

    #[test]
    fn test_request_creation() {
        let operation = A2AOperation::SendMessage {
            message: Message::user("Test"),
            stream: false,
        };

        let request = A2ARequest::new(operation, RequestContext::default());
        assert!(request.context.rpc_url.is_none());
        assert!(!request.operation.is_streaming());
    }
}
