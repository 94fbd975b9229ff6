use std::{
    sync::{Arc, Mutex},
    task::{Context, Poll},
};

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use url::Url;

use crate::{
    protocol::error::A2AError,
    transport::{ByteStream, Transport, TransportRequest, TransportResponse},
};

type UnaryHandler = Arc<dyn Fn(&TransportRequest) -> Result<TransportResponse, A2AError> + Send + Sync>;
type StreamHandler =
    Arc<dyn Fn(&TransportRequest) -> Result<Vec<Result<String, A2AError>>, A2AError> + Send + Sync>;

/// Mock transport for internal testing
///
/// Answers unary requests through `handler` and streaming requests through
/// `stream_handler`, whose items are raw body chunks. Every request is
/// recorded.
#[derive(Clone)]
pub(crate) struct MockTransport {
    handler: UnaryHandler,
    stream_handler: Option<StreamHandler>,
    requests: Arc<Mutex<Vec<TransportRequest>>>,
    base_url: Url,
}

impl MockTransport {
    /// Create a new mock transport with a custom request handler
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&TransportRequest) -> Result<TransportResponse, A2AError> + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
            stream_handler: None,
            requests: Arc::default(),
            base_url: Url::parse("http://mock.agent/a2a/").unwrap(),
        }
    }

    /// Respond to every unary request with `body` and status 200
    pub fn json(body: impl Into<String>) -> Self {
        let body = body.into();
        Self::new(move |_| Ok(TransportResponse::new(200).body(body.clone())))
    }

    pub fn with_stream<F>(mut self, handler: F) -> Self
    where
        F: Fn(&TransportRequest) -> Result<Vec<Result<String, A2AError>>, A2AError>
            + Send
            + Sync
            + 'static,
    {
        self.stream_handler = Some(Arc::new(handler));
        self
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, request: &TransportRequest) {
        self.requests.lock().unwrap().push(request.clone());
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), A2AError>> {
        Poll::Ready(Ok(()))
    }

    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, A2AError> {
        self.record(&request);
        (self.handler)(&request)
    }

    async fn execute_streaming(&self, request: TransportRequest) -> Result<ByteStream, A2AError> {
        self.record(&request);
        let Some(handler) = &self.stream_handler else {
            return Err(A2AError::Protocol("no stream handler".to_string()));
        };
        let chunks = handler(&request)?
            .into_iter()
            .map(|chunk| chunk.map(Bytes::from));
        Ok(futures::stream::iter(chunks).boxed())
    }

    fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn supports_streaming(&self) -> bool {
        self.stream_handler.is_some()
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Wrap a JSON-RPC `result` into one SSE frame
pub(crate) fn sse_frame(result: serde_json::Value) -> String {
    let envelope = serde_json::json!({"jsonrpc": "2.0", "id": "1", "result": result});
    format!("data: {}\n\n", envelope)
}
