//! HTTP transport implementation for A2A protocol

use std::{
    collections::HashMap,
    task::{Context, Poll},
};

use async_trait::async_trait;
use bytes::Bytes;
use futures::{stream, StreamExt, TryStreamExt};
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::protocol::error::A2AError;

use super::{ensure_trailing_slash, ByteStream, Transport, TransportRequest, TransportResponse};

/// HTTP transport implementation using reqwest
///
/// Endpoints are resolved against the base URL, so an absolute endpoint (the
/// `url` advertised by an agent card) replaces the base entirely.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    /// Create a new HTTP transport
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the agent (e.g., "<https://agent.example.com/api/a2a/homelab>")
    pub fn new(base_url: Url) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Create a new HTTP transport with a custom reqwest client
    pub fn with_client(base_url: Url, client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: ensure_trailing_slash(base_url),
        }
    }

    fn build(&self, request: TransportRequest) -> Result<reqwest::RequestBuilder, A2AError> {
        let url = self.base_url.join(&request.endpoint)?;

        let mut builder = match request.method.as_str() {
            "POST" => self.client.post(url),
            "GET" => self.client.get(url),
            "PUT" => self.client.put(url),
            "DELETE" => self.client.delete(url),
            _ => {
                return Err(A2AError::Transport(format!(
                    "Unsupported HTTP method: {}",
                    request.method
                )))
            }
        };

        for (key, value) in request.headers {
            builder = builder.header(key, value);
        }

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        if !request.body.is_empty() {
            builder = builder.body(request.body);
        }

        Ok(builder)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), A2AError>> {
        // HTTP client is always ready
        Poll::Ready(Ok(()))
    }

    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, A2AError> {
        let response = self.build(request)?.send().await?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();

        let body = response.bytes().await?;

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }

    async fn execute_streaming(
        &self,
        mut request: TransportRequest,
    ) -> Result<ByteStream, A2AError> {
        request
            .headers
            .entry("Accept".to_string())
            .or_insert_with(|| "text/event-stream".to_string());
        let response = self.build(request)?.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(A2AError::Transport(format!(
                "HTTP streaming request failed with status {}: {}",
                status, body
            )));
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/json"));

        // Agents that ignore the SSE request answer with a single JSON-RPC
        // body; present it as one SSE frame.
        if is_json {
            let body = response.bytes().await?;
            let mut frame = Vec::with_capacity(body.len() + 8);
            frame.extend_from_slice(b"data: ");
            frame.extend_from_slice(&body);
            frame.extend_from_slice(b"\n\n");
            let once = stream::once(async move { Ok::<_, A2AError>(Bytes::from(frame)) });
            return Ok(once.boxed());
        }

        Ok(response.bytes_stream().map_err(A2AError::from).boxed())
    }

    fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn supports_streaming(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_transport_normalizes_base() {
        let transport =
            HttpTransport::new(Url::parse("https://agents.example.com/api/a2a/homelab").unwrap());
        assert_eq!(
            transport.base_url().as_str(),
            "https://agents.example.com/api/a2a/homelab/"
        );
        assert!(transport.supports_streaming());
    }

    #[test]
    fn test_unsupported_method() {
        let transport = HttpTransport::new(Url::parse("https://example.com").unwrap());
        let err = transport
            .build(TransportRequest::new("", "PATCH"))
            .unwrap_err();
        assert!(matches!(err, A2AError::Transport(msg) if msg.contains("PATCH")));
    }
}
