//! JSON-RPC 2.0 envelopes and the client-side codec
//!
//! The envelope types are shared by the client codec and the task server.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    codec::Codec,
    protocol::{
        agent::AgentCard,
        error::A2AError,
        operation::A2AOperation,
        task::{MessageSendConfiguration, MessageSendParams, Task},
        StreamResponse,
    },
    service::response::A2AResponse,
};

pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC 2.0 error codes
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
}

/// A2A JSON-RPC method names
pub mod methods {
    pub const MESSAGE_SEND: &str = "message/send";
    pub const MESSAGE_STREAM: &str = "message/stream";
    pub const TASKS_GET: &str = "tasks/get";
    pub const TASKS_CANCEL: &str = "tasks/cancel";
}

/// JSON-RPC 2.0 request envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Value,
    #[serde(default)]
    pub id: Value,
}

impl JsonRpcRequest {
    pub fn new(method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id: Value::String(Uuid::now_v7().to_string()),
        }
    }
}

/// JSON-RPC 2.0 response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    /// Echoed request id; `null` when the request id could not be read
    #[serde(default)]
    pub id: Value,
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn error(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
            id,
        }
    }

    /// Unwrap the result, turning an error object into [`A2AError::JsonRpc`]
    pub fn into_result(self) -> Result<Value, A2AError> {
        if let Some(error) = self.error {
            return Err(A2AError::JsonRpc {
                code: error.code,
                message: error.message,
            });
        }

        self.result.ok_or_else(|| {
            A2AError::Protocol("JSON-RPC response missing 'result' field".to_string())
        })
    }
}

/// JSON-RPC 2.0 error object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// JSON-RPC 2.0 codec for the A2A client
///
/// Wraps operations in JSON-RPC request envelopes and unwraps responses.
/// Discovery is plain JSON and bypasses the envelope.
#[derive(Debug, Clone, Default)]
pub struct JsonRpcCodec;

impl JsonRpcCodec {
    /// Create a new JSON-RPC codec
    pub fn new() -> Self {
        Self
    }

    /// Map an A2A operation to a JSON-RPC method name
    fn operation_to_method(operation: &A2AOperation) -> Option<&'static str> {
        match operation {
            A2AOperation::SendMessage { stream: true, .. } => Some(methods::MESSAGE_STREAM),
            A2AOperation::SendMessage { stream: false, .. } => Some(methods::MESSAGE_SEND),
            A2AOperation::GetTask { .. } => Some(methods::TASKS_GET),
            A2AOperation::CancelTask { .. } => Some(methods::TASKS_CANCEL),
            A2AOperation::DiscoverAgent => None,
        }
    }

    fn params(operation: &A2AOperation) -> Result<Value, A2AError> {
        let params = match operation {
            A2AOperation::SendMessage { message, .. } => {
                let mut params = MessageSendParams::new(message.clone());
                params.configuration = Some(MessageSendConfiguration {
                    blocking: Some(true),
                    ..Default::default()
                });
                serde_json::to_value(params)?
            }
            A2AOperation::GetTask { task_id } | A2AOperation::CancelTask { task_id } => {
                json!({ "id": task_id })
            }
            A2AOperation::DiscoverAgent => Value::Null,
        };
        Ok(params)
    }
}

impl Codec for JsonRpcCodec {
    fn encode_request(&self, operation: &A2AOperation) -> Result<Bytes, A2AError> {
        let Some(method) = Self::operation_to_method(operation) else {
            return Ok(Bytes::new());
        };

        let request = JsonRpcRequest::new(method, Self::params(operation)?);
        let bytes = serde_json::to_vec(&request)?;
        Ok(Bytes::from(bytes))
    }

    fn decode_response(
        &self,
        body: &[u8],
        operation: &A2AOperation,
    ) -> Result<A2AResponse, A2AError> {
        if let A2AOperation::DiscoverAgent = operation {
            let card: AgentCard = serde_json::from_slice(body)?;
            return Ok(A2AResponse::AgentCard(Box::new(card)));
        }

        // Empty responses
        if body.is_empty() {
            return Ok(A2AResponse::Empty);
        }

        let envelope: JsonRpcResponse = serde_json::from_slice(body)
            .map_err(|e| A2AError::Protocol(format!("Failed to parse JSON-RPC response: {}", e)))?;
        let result = envelope.into_result()?;

        match operation {
            A2AOperation::SendMessage { .. } => match StreamResponse::from_value(result) {
                StreamResponse::Message(message) => Ok(A2AResponse::Message(Box::new(message))),
                StreamResponse::Task(task) => Ok(A2AResponse::Task(Box::new(task))),
                other => Err(A2AError::Protocol(format!(
                    "Unexpected message/send result: {:?}",
                    other
                ))),
            },
            _ => {
                let task: Task = serde_json::from_value(result)?;
                Ok(A2AResponse::Task(Box::new(task)))
            }
        }
    }

    fn content_type(&self) -> &str {
        "application/json"
    }
}
