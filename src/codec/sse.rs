//! Server-Sent Events (SSE) codec for `message/stream` responses
//!
//! Each SSE `data:` frame carries one JSON-RPC 2.0 response whose `result`
//! is a message, a task, or a task update event.

use eventsource_stream::Eventsource;
use futures::stream::{Stream, StreamExt};
use serde_json::Value;

use crate::{codec::jsonrpc::JsonRpcResponse, protocol::{error::A2AError, StreamResponse}};

/// SSE codec for parsing streaming responses
#[derive(Debug, Clone, Default)]
pub struct SseCodec;

impl SseCodec {
    /// Create a new SSE codec
    pub fn new() -> Self {
        Self
    }

    /// Decode the data of one SSE frame
    pub fn decode_frame(data: &str) -> Result<StreamResponse, A2AError> {
        let value: Value = serde_json::from_str(data)
            .map_err(|e| A2AError::Protocol(format!("Failed to parse SSE event data: {}", e)))?;

        // Some agents stream bare results without the JSON-RPC envelope
        if value.get("jsonrpc").is_none() {
            return Ok(StreamResponse::from_value(value));
        }

        let envelope: JsonRpcResponse = serde_json::from_value(value)
            .map_err(|e| A2AError::Protocol(format!("Invalid JSON-RPC frame: {}", e)))?;
        let result = envelope.into_result()?;
        Ok(StreamResponse::from_value(result))
    }

    /// Parse an SSE byte stream into a stream of decoded results
    ///
    /// Frames with empty data (keep-alives) are skipped.
    pub fn parse_stream<S, B, E>(
        &self,
        byte_stream: S,
    ) -> impl Stream<Item = Result<StreamResponse, A2AError>>
    where
        S: Stream<Item = Result<B, E>> + Send + 'static,
        B: AsRef<[u8]>,
        E: std::fmt::Display,
    {
        byte_stream.eventsource().filter_map(|result| async move {
            match result {
                Ok(event) if event.data.trim().is_empty() => None,
                Ok(event) => Some(Self::decode_frame(&event.data)),
                Err(e) => Some(Err(A2AError::Transport(format!("SSE stream error: {}", e)))),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::{pin_mut, StreamExt};

    use super::*;

    fn byte_stream(
        data: &'static str,
    ) -> impl Stream<Item = Result<bytes::Bytes, A2AError>> + Send + 'static {
        futures::stream::once(async move { Ok(bytes::Bytes::from(data)) })
    }

    #[tokio::test]
    async fn test_parse_sse_stream() {
        let codec = SseCodec::new();

        let sse_data = "data: {\"jsonrpc\":\"2.0\",\"id\":\"1\",\"result\":{\"kind\":\"task\",\"id\":\"t-1\",\"contextId\":\"c-1\",\"status\":{\"state\":\"submitted\"}}}\n\n\
                        data: {\"jsonrpc\":\"2.0\",\"id\":\"1\",\"result\":{\"kind\":\"status-update\",\"taskId\":\"t-1\",\"status\":{\"state\":\"completed\"},\"final\":true}}\n\n";

        let events = codec.parse_stream(byte_stream(sse_data));
        pin_mut!(events);

        match events.next().await.unwrap().unwrap() {
            StreamResponse::Task(task) => assert_eq!(task.id, "t-1"),
            other => panic!("Expected task, got {:?}", other),
        }

        match events.next().await.unwrap().unwrap() {
            StreamResponse::StatusUpdate(update) => assert!(update.is_final),
            other => panic!("Expected status update, got {:?}", other),
        }

        assert!(events.next().await.is_none());
    }

    #[tokio::test]
    async fn test_parse_sse_error() {
        let codec = SseCodec::new();

        let sse_data = "data: {\"jsonrpc\":\"2.0\",\"error\":{\"code\":-32603,\"message\":\"Agent crashed\"},\"id\":\"1\"}\n\n";

        let events = codec.parse_stream(byte_stream(sse_data));
        pin_mut!(events);

        match events.next().await.unwrap() {
            Err(A2AError::JsonRpc { code, message }) => {
                assert_eq!(code, -32603);
                assert!(message.contains("Agent crashed"));
            }
            other => panic!("Expected JSON-RPC error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_bare_frame() {
        let resp = SseCodec::decode_frame(
            r#"{"kind":"message","role":"agent","parts":[{"kind":"text","text":"hi"}]}"#,
        )
        .unwrap();
        assert!(matches!(resp, StreamResponse::Message(_)));
    }

    #[test]
    fn test_decode_garbage_frame() {
        assert!(matches!(
            SseCodec::decode_frame("not json"),
            Err(A2AError::Protocol(_))
        ));
    }
}
