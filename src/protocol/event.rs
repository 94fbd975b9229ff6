//! Events produced while a remote agent answers a message

use serde_json::Value;

use super::{
    message::Message,
    task::{Task, TaskArtifactUpdateEvent, TaskStatusUpdateEvent},
};

/// One `result` object of a `message/send` or `message/stream` response,
/// decoded by its `kind` discriminator
#[derive(Debug, Clone, PartialEq)]
pub enum StreamResponse {
    Message(Message),
    Task(Task),
    StatusUpdate(TaskStatusUpdateEvent),
    ArtifactUpdate(TaskArtifactUpdateEvent),
    /// Anything that is not one of the known shapes, kept verbatim
    Unknown(Value),
}

impl StreamResponse {
    /// Decode a JSON-RPC `result` value.
    ///
    /// Never fails: payloads that are malformed or of an unrecognized kind
    /// become [`StreamResponse::Unknown`]. Payloads without a `kind` field are
    /// recognized by their required fields.
    pub fn from_value(value: Value) -> Self {
        let kind = value
            .get("kind")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .or_else(|| infer_kind(&value).map(str::to_owned));

        let decoded = match kind.as_deref() {
            Some("message") => serde_json::from_value(value.clone()).map(Self::Message),
            Some("task") => serde_json::from_value(value.clone()).map(Self::Task),
            Some("status-update") => serde_json::from_value(value.clone()).map(Self::StatusUpdate),
            Some("artifact-update") => {
                serde_json::from_value(value.clone()).map(Self::ArtifactUpdate)
            }
            _ => return Self::Unknown(value),
        };

        decoded.unwrap_or_else(|err| {
            tracing::warn!(kind = ?kind, error = %err, "Malformed A2A stream payload");
            Self::Unknown(value)
        })
    }
}

fn infer_kind(value: &Value) -> Option<&'static str> {
    let has = |field: &str| value.get(field).is_some();
    if has("role") && has("parts") {
        Some("message")
    } else if has("artifact") && has("taskId") {
        Some("artifact-update")
    } else if has("status") && has("taskId") {
        Some("status-update")
    } else if has("status") && has("id") {
        Some("task")
    } else {
        None
    }
}

/// A remote agent event in the shape the client adapter consumes
///
/// A remote agent answers either with a single message, or with a task whose
/// progress is reported through status and artifact updates. Each update is
/// paired with the task it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub enum ProtocolEvent {
    /// A message carrying final text directly
    TextMessage(Message),

    /// A task with no accompanying update (initial snapshot)
    TaskSnapshot(Task),

    /// A task together with a text-bearing artifact update
    TaskArtifact {
        task: Task,
        update: TaskArtifactUpdateEvent,
    },

    /// A task together with a state transition
    TaskStatus {
        task: Task,
        update: TaskStatusUpdateEvent,
    },

    /// An event of unrecognized shape
    Unknown(Value),
}

impl ProtocolEvent {
    /// Expand a completed unary `message/send` task into the events a stream
    /// would have delivered: the snapshot, one update per artifact, then the
    /// final status.
    pub fn from_task(task: Task) -> Vec<ProtocolEvent> {
        let mut events = Vec::with_capacity(task.artifacts.len() + 2);
        events.push(ProtocolEvent::TaskSnapshot(task.clone()));

        for artifact in &task.artifacts {
            events.push(ProtocolEvent::TaskArtifact {
                task: task.clone(),
                update: TaskArtifactUpdateEvent {
                    kind: "artifact-update".to_string(),
                    task_id: task.id.clone(),
                    context_id: task.context_id.clone(),
                    artifact: artifact.clone(),
                    append: None,
                    last_chunk: Some(true),
                    metadata: None,
                },
            });
        }

        events.push(ProtocolEvent::TaskStatus {
            update: TaskStatusUpdateEvent {
                kind: "status-update".to_string(),
                task_id: task.id.clone(),
                context_id: task.context_id.clone(),
                status: task.status.clone(),
                is_final: true,
                metadata: None,
            },
            task,
        });

        events
    }
}
