//! Transport abstraction layer for A2A protocol

pub mod http;
#[cfg(test)]
pub(crate) mod mock;

use std::{
    collections::HashMap,
    pin::Pin,
    task::{Context, Poll},
    time::Duration,
};

pub use http::HttpTransport;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use url::Url;

use crate::protocol::error::A2AError;

/// Raw body chunks of a streaming response
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, A2AError>> + Send>>;

/// Protocol-agnostic transport request
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// Endpoint relative to the transport base URL, or an absolute URL
    pub endpoint: String,

    /// HTTP method or equivalent operation (e.g., "POST", "GET")
    pub method: String,

    /// Headers or metadata for the request
    pub headers: HashMap<String, String>,

    /// Request body as bytes
    pub body: Bytes,

    /// Upper bound for the whole exchange, body included
    pub timeout: Option<Duration>,
}

impl TransportRequest {
    /// Create a new transport request
    pub fn new(endpoint: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method: method.into(),
            headers: HashMap::new(),
            body: Bytes::new(),
            timeout: None,
        }
    }

    /// Add a header to the request
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the request body
    pub fn body(mut self, body: Bytes) -> Self {
        self.body = body;
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Protocol-agnostic transport response
#[derive(Debug)]
pub struct TransportResponse {
    /// Status code (e.g., HTTP status code)
    pub status: u16,

    /// Response headers or metadata
    pub headers: HashMap<String, String>,

    /// Response body as bytes
    pub body: Bytes,
}

impl TransportResponse {
    /// Create a new transport response
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Bytes::new(),
        }
    }

    /// Set the response body
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Check if the response indicates success (2xx status code)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Core transport trait for executing protocol-agnostic requests
///
/// Abstracts over the network layer so the A2A protocol service only deals
/// with endpoints, headers and bodies.
#[async_trait]
pub trait Transport: Clone + Send + Sync + 'static {
    /// Check if the transport is ready to accept requests
    ///
    /// This is used by Tower's Service trait to implement backpressure
    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), A2AError>>;

    /// Execute a request and buffer the whole response
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, A2AError>;

    /// Execute a request whose response body is a Server-Sent-Events stream
    ///
    /// Fails before yielding anything if the request is rejected.
    async fn execute_streaming(&self, request: TransportRequest) -> Result<ByteStream, A2AError> {
        let _ = request;
        Err(A2AError::Protocol(
            "Streaming is not supported by this transport".to_string(),
        ))
    }

    /// Base URL the request endpoints are resolved against
    fn base_url(&self) -> &Url;

    /// Check if this transport supports streaming responses
    fn supports_streaming(&self) -> bool {
        false
    }
}

/// Make sure a base URL ends with `/` so relative endpoints resolve below it
/// and discovery does not bounce through a redirect.
pub fn ensure_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_trailing_slash() {
        let url = Url::parse("http://agents.local/api/a2a/homelab").unwrap();
        assert_eq!(
            ensure_trailing_slash(url).as_str(),
            "http://agents.local/api/a2a/homelab/"
        );

        let url = Url::parse("http://agents.local/api/").unwrap();
        assert_eq!(ensure_trailing_slash(url).as_str(), "http://agents.local/api/");

        let url = Url::parse("http://agents.local").unwrap();
        assert_eq!(ensure_trailing_slash(url).as_str(), "http://agents.local/");
    }

    #[test]
    fn test_relative_endpoints_resolve_below_base() {
        let base = ensure_trailing_slash(Url::parse("http://agents.local/api/a2a/homelab").unwrap());
        assert_eq!(
            base.join(".well-known/agent-card.json").unwrap().as_str(),
            "http://agents.local/api/a2a/homelab/.well-known/agent-card.json"
        );
        assert_eq!(base.join("").unwrap(), base);
    }
}
