//! JSON-RPC 2.0 dispatch for the local A2A endpoint
//!
//! - `message/send`, `message/stream`: run the processor, answer with a task
//! - `tasks/get`: always "task not found", tasks are not kept
//! - `tasks/cancel`: always an already canceled task
//!
//! Every outcome is a [`JsonRpcResponse`]; processing failures are reported as
//! failed tasks rather than JSON-RPC errors.

use std::sync::Arc;

use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    client::classifier::preview,
    codec::jsonrpc::{error_codes, methods, JsonRpcResponse, JSONRPC_VERSION},
    protocol::{task::TaskIdParams, Artifact, Message, Part, Role, Task, TaskState},
    server::processor::{AgentProcessor, ProcessRequest},
};

/// Decode one request body and answer it
pub async fn dispatch(body: &[u8], processor: Arc<dyn AgentProcessor>) -> JsonRpcResponse {
    let request: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "Unparseable JSON-RPC body");
            return JsonRpcResponse::error(Value::Null, error_codes::PARSE_ERROR, "Parse error");
        }
    };

    if !request.is_object() {
        return JsonRpcResponse::error(
            Value::Null,
            error_codes::INVALID_REQUEST,
            "Invalid Request: expected an object",
        );
    }

    let id = request.get("id").cloned().unwrap_or(Value::Null);

    if request.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
        return JsonRpcResponse::error(
            id,
            error_codes::INVALID_REQUEST,
            "Invalid Request: missing jsonrpc 2.0",
        );
    }

    let Some(method) = request.get("method").and_then(Value::as_str) else {
        return JsonRpcResponse::error(
            id,
            error_codes::INVALID_REQUEST,
            "Invalid Request: missing method",
        );
    };

    let params = request.get("params").cloned().unwrap_or_else(|| json!({}));
    tracing::info!(method, id = %id, "A2A request");

    match method {
        // No streaming yet: the card says so and both answer the same way.
        methods::MESSAGE_SEND | methods::MESSAGE_STREAM => {
            handle_message_send(id, &params, processor).await
        }
        methods::TASKS_GET => handle_tasks_get(id, &params),
        methods::TASKS_CANCEL => handle_tasks_cancel(id, &params),
        _ => JsonRpcResponse::error(
            id,
            error_codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", method),
        ),
    }
}

async fn handle_message_send(
    id: Value,
    params: &Value,
    processor: Arc<dyn AgentProcessor>,
) -> JsonRpcResponse {
    let message = params.get("message").unwrap_or(&Value::Null);
    let raw_parts = message
        .get("parts")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let text = extract_text(raw_parts);
    if text.is_empty() {
        return JsonRpcResponse::error(
            id,
            error_codes::INVALID_PARAMS,
            "Invalid params: no text content in message",
        );
    }

    let supplied_context = string_field(params, "contextId")
        .or_else(|| string_field(message, "contextId"));
    let continued = supplied_context.is_some();
    let context_id = supplied_context.unwrap_or_else(|| Uuid::new_v4().to_string());
    let message_id =
        string_field(message, "messageId").unwrap_or_else(|| Uuid::new_v4().to_string());

    let request = ProcessRequest {
        task_id: Uuid::new_v4().to_string(),
        context_id,
        text,
        continued,
    };
    tracing::info!(
        task_id = %request.task_id,
        context_id = %request.context_id,
        continued,
        preview = %preview(&request.text),
        "Processing A2A message"
    );

    let outcome = {
        let request = request.clone();
        tokio::task::spawn_blocking(move || processor.process(&request)).await
    };

    let task = match outcome {
        Ok(Ok(reply)) => {
            let user_parts = raw_parts
                .iter()
                .filter_map(|part| serde_json::from_value::<Part>(part.clone()).ok())
                .collect();
            let user = Message::with_parts(Role::User, user_parts).with_message_id(message_id);
            let agent = Message::agent(reply.clone()).with_message_id(Uuid::new_v4().to_string());

            Task::new(request.task_id, Some(request.context_id))
                .with_status(TaskState::Completed)
                .with_artifact(Artifact::text("response", reply))
                .with_history_message(user)
                .with_history_message(agent)
        }
        Ok(Err(e)) => {
            tracing::error!(task_id = %request.task_id, error = %e, "Processing A2A message failed");
            failed_task(request, e.to_string())
        }
        Err(e) => {
            tracing::error!(task_id = %request.task_id, error = %e, "Processing A2A message panicked");
            failed_task(request, e.to_string())
        }
    };

    task_response(id, &task)
}

fn failed_task(request: ProcessRequest, cause: String) -> Task {
    Task::new(request.task_id, Some(request.context_id))
        .with_status(TaskState::Failed)
        .with_status_message(Message::agent(format!("Error: {}", cause)))
}

fn handle_tasks_get(id: Value, params: &Value) -> JsonRpcResponse {
    let task_id = task_id_param(params);
    JsonRpcResponse::error(
        id,
        error_codes::INVALID_PARAMS,
        format!("Task not found: {}", task_id),
    )
}

/// Requests finish before the response is sent, so there is never anything
/// left to cancel.
fn handle_tasks_cancel(id: Value, params: &Value) -> JsonRpcResponse {
    let task = Task::new(task_id_param(params), None).with_status(TaskState::Canceled);
    task_response(id, &task)
}

fn task_response(id: Value, task: &Task) -> JsonRpcResponse {
    match serde_json::to_value(task) {
        Ok(result) => JsonRpcResponse::success(id, result),
        Err(e) => JsonRpcResponse::error(
            id,
            error_codes::INTERNAL_ERROR,
            format!("Internal error: {}", e),
        ),
    }
}

/// Space-joined text of the `kind: "text"` parts
fn extract_text(parts: &[Value]) -> String {
    parts
        .iter()
        .filter(|part| part.get("kind").and_then(Value::as_str) == Some("text"))
        .map(|part| part.get("text").and_then(Value::as_str).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_owned)
}

fn task_id_param(params: &Value) -> String {
    serde_json::from_value::<TaskIdParams>(params.clone())
        .ok()
        .and_then(|params| params.id)
        .unwrap_or_default()
}
