//! Core A2A protocol service implementation

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use futures::StreamExt;
use tower_service::Service;

use crate::{
    codec::{Codec, SseCodec},
    protocol::{error::A2AError, operation::A2AOperation},
    service::{stream::TaskTracker, A2ARequest, A2AResponse},
    transport::{Transport, TransportRequest, TransportResponse},
};

/// Core A2A protocol service that wraps a transport
///
/// This service implements the Tower `Service` trait and provides the core logic
/// for executing A2A operations over any transport. Streaming sends resolve
/// to [`A2AResponse::Events`].
pub struct A2AProtocolService<T> {
    transport: T,
    codec: Arc<dyn Codec>,
}

impl<T> A2AProtocolService<T>
where
    T: Transport,
{
    /// Create a new A2A protocol service
    ///
    /// # Arguments
    ///
    /// * `transport` - The underlying transport implementation
    /// * `codec` - The codec for serialization/deserialization
    pub fn new(transport: T, codec: Arc<dyn Codec>) -> Self {
        Self { transport, codec }
    }

    /// Build a transport request from an A2A operation
    fn build_transport_request(
        req: &A2ARequest,
        codec: &dyn Codec,
    ) -> Result<TransportRequest, A2AError> {
        let method = req.operation.method();
        let endpoint = match (&req.context.rpc_url, req.operation.is_json_rpc()) {
            (Some(rpc_url), true) => rpc_url.as_str(),
            _ => req.operation.endpoint(),
        };

        let mut transport_req =
            TransportRequest::new(endpoint, method).timeout(req.context.timeout);

        if method != "GET" {
            transport_req = transport_req.header("Content-Type", codec.content_type());
        }
        let accept = if req.operation.is_streaming() {
            "text/event-stream"
        } else {
            codec.content_type()
        };
        transport_req = transport_req.header("Accept", accept);

        if let Some(auth) = &req.context.auth {
            let (header, value) = auth.to_header();
            transport_req = transport_req.header(header, value);
        }

        for (key, value) in &req.context.metadata {
            transport_req = transport_req.header(key.clone(), value.clone());
        }

        let body = codec.encode_request(&req.operation)?;
        if !body.is_empty() && method != "GET" {
            transport_req = transport_req.body(body);
        }

        Ok(transport_req)
    }

    /// Parse a transport response into an A2A response
    fn parse_transport_response(
        transport_resp: TransportResponse,
        codec: &dyn Codec,
        operation: &A2AOperation,
    ) -> Result<A2AResponse, A2AError> {
        if !transport_resp.is_success() {
            return Err(Self::handle_error_response(&transport_resp));
        }

        codec.decode_response(&transport_resp.body, operation)
    }

    /// Handle error responses from the transport
    fn handle_error_response(transport_resp: &TransportResponse) -> A2AError {
        let message = serde_json::from_slice::<serde_json::Value>(&transport_resp.body)
            .ok()
            .and_then(|json| {
                json.get("message")
                    .or_else(|| json.pointer("/error/message"))
                    .and_then(|v| v.as_str())
                    .map(str::to_owned)
            });

        match (transport_resp.status, message) {
            (401 | 403, message) => {
                A2AError::Auth(message.unwrap_or_else(|| "Access denied".to_string()))
            }
            (429, _) => A2AError::RateLimitExceeded,
            (status, Some(message)) => A2AError::Transport(format!("HTTP {}: {}", status, message)),
            (status, None) => A2AError::Transport(format!("HTTP error: {}", status)),
        }
    }
}

impl<T> Service<A2ARequest> for A2AProtocolService<T>
where
    T: Transport + Clone,
{
    type Response = A2AResponse;
    type Error = A2AError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.transport.poll_ready(cx)
    }

    fn call(&mut self, req: A2ARequest) -> Self::Future {
        let transport = self.transport.clone();
        let codec = self.codec.clone();

        Box::pin(async move {
            let transport_req = Self::build_transport_request(&req, codec.as_ref())?;

            if req.operation.is_streaming() {
                let bytes = transport.execute_streaming(transport_req).await?;

                let mut tracker = TaskTracker::new();
                let events = SseCodec::new()
                    .parse_stream(bytes)
                    .map(move |item| item.map(|resp| tracker.observe(resp)));
                return Ok(A2AResponse::Events(Box::pin(events)));
            }

            let transport_resp = transport.execute(transport_req).await?;
            Self::parse_transport_response(transport_resp, codec.as_ref(), &req.operation)
        })
    }
}

impl<T> Clone for A2AProtocolService<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            codec: self.codec.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;
    use serde_json::json;

    use crate::{
        codec::JsonRpcCodec,
        protocol::{message::Message, task::TaskState, ProtocolEvent},
        service::RequestContext,
        transport::mock::{sse_frame, MockTransport},
    };

    use super::*;

    fn service(transport: MockTransport) -> A2AProtocolService<MockTransport> {
        A2AProtocolService::new(transport, Arc::new(JsonRpcCodec::new()))
    }

    #[tokio::test]
    async fn test_service_send_message() {
        let transport = MockTransport::json(
            json!({
                "jsonrpc": "2.0",
                "id": "1",
                "result": {"kind": "task", "id": "task-123", "status": {"state": "completed"}}
            })
            .to_string(),
        );
        let mut svc = service(transport.clone());

        let operation = A2AOperation::SendMessage {
            message: Message::user("Hello"),
            stream: false,
        };
        let context = RequestContext::new().with_rpc_url("http://remote.agent/rpc");
        let response = svc.call(A2ARequest::new(operation, context)).await.unwrap();

        match response {
            A2AResponse::Task(task) => assert_eq!(task.id, "task-123"),
            other => panic!("Expected Task response, got {:?}", other),
        }

        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].endpoint, "http://remote.agent/rpc");
        assert_eq!(sent[0].method, "POST");
        assert_eq!(
            sent[0].headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
    }

    #[tokio::test]
    async fn test_discovery_ignores_rpc_url() {
        let transport = MockTransport::json(r#"{"name": "remote"}"#);
        let mut svc = service(transport.clone());

        let context = RequestContext::new().with_rpc_url("http://remote.agent/rpc");
        let response = svc
            .call(A2ARequest::new(A2AOperation::DiscoverAgent, context))
            .await
            .unwrap();
        assert_eq!(response.into_agent_card().unwrap().name, "remote");

        let sent = transport.requests();
        assert_eq!(sent[0].endpoint, ".well-known/agent-card.json");
        assert_eq!(sent[0].method, "GET");
        assert!(sent[0].body.is_empty());
    }

    #[tokio::test]
    async fn test_service_streaming() {
        let transport = MockTransport::json("{}").with_stream(|_| {
            Ok(vec![
                Ok(sse_frame(json!({"kind": "task", "id": "t-1", "contextId": "c-1", "status": {"state": "working"}}))),
                Ok(sse_frame(json!({"kind": "status-update", "taskId": "t-1", "status": {"state": "completed"}, "final": true}))),
            ])
        });
        let mut svc = service(transport);

        let operation = A2AOperation::SendMessage {
            message: Message::user("Hello"),
            stream: true,
        };
        let response = svc
            .call(A2ARequest::new(operation, RequestContext::default()))
            .await
            .unwrap();

        let events: Vec<_> = response.into_events().unwrap().collect().await;
        assert_eq!(events.len(), 2);
        match &events[1] {
            Ok(ProtocolEvent::TaskStatus { task, .. }) => {
                assert_eq!(task.context_id.as_deref(), Some("c-1"));
                assert_eq!(task.status.state, TaskState::Completed);
            }
            other => panic!("Expected status event, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_service_error_handling() {
        let transport = MockTransport::new(|_req| {
            Ok(TransportResponse::new(401).body(r#"{"message": "Unauthorized"}"#))
        });
        let mut svc = service(transport);

        let operation = A2AOperation::GetTask {
            task_id: "task-123".to_string(),
        };
        let result = svc
            .call(A2ARequest::new(operation, RequestContext::default()))
            .await;

        assert!(matches!(result.unwrap_err(), A2AError::Auth(_)));
    }

    #[tokio::test]
    async fn test_service_http_error_without_body() {
        let transport = MockTransport::new(|_req| Ok(TransportResponse::new(502)));
        let mut svc = service(transport);

        let result = svc
            .call(A2ARequest::new(A2AOperation::DiscoverAgent, RequestContext::default()))
            .await;

        match result {
            Err(err @ A2AError::Transport(_)) => {
                assert!(err.to_string().contains("502"));
                assert!(err.is_connectivity());
            }
            other => panic!("Expected transport error, got {:?}", other),
        }
    }
}
