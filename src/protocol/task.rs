//! A2A task types and lifecycle events

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{message::Message, Artifact};

fn task_kind() -> String {
    "task".to_string()
}

fn status_update_kind() -> String {
    "status-update".to_string()
}

fn artifact_update_kind() -> String {
    "artifact-update".to_string()
}

/// A task in the A2A protocol
///
/// Tasks represent units of remote work. They move from submitted through
/// working to a terminal state, and collect artifacts and message history on the way.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Object discriminator, always `"task"`
    #[serde(default = "task_kind")]
    pub kind: String,

    /// Unique identifier for the task
    pub id: String,

    /// Context the task belongs to
    #[serde(rename = "contextId", skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,

    /// Current status of the task
    pub status: TaskStatus,

    /// Outputs produced by the task
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<Artifact>,

    /// Messages exchanged while working on the task
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<Message>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl Task {
    /// Create a new task in the `submitted` state
    pub fn new(id: impl Into<String>, context_id: Option<String>) -> Self {
        Self {
            kind: task_kind(),
            id: id.into(),
            context_id,
            status: TaskStatus::new(TaskState::Submitted),
            artifacts: Vec::new(),
            history: Vec::new(),
            metadata: None,
        }
    }

    /// Check if the task is in a terminal state
    pub fn is_terminal(&self) -> bool {
        self.status.state.is_terminal()
    }

    /// Move the task to a new state, stamping the transition time
    pub fn with_status(mut self, state: TaskState) -> Self {
        self.status = TaskStatus::new(state);
        self
    }

    /// Attach an agent message to the current status
    pub fn with_status_message(mut self, message: Message) -> Self {
        self.status.message = Some(message);
        self
    }

    /// Add an artifact
    pub fn with_artifact(mut self, artifact: Artifact) -> Self {
        self.artifacts.push(artifact);
        self
    }

    /// Append a message to the task history
    pub fn with_history_message(mut self, message: Message) -> Self {
        self.history.push(message);
        self
    }

    /// The identifier a follow-up turn should reuse as its context.
    ///
    /// Prefers the explicit context id and falls back to the task id when the
    /// remote agent did not assign one.
    pub fn context_anchor(&self) -> Option<&str> {
        self.context_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .or_else(|| Some(self.id.as_str()).filter(|id| !id.is_empty()))
    }
}

/// Task status: lifecycle state plus when it was entered
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskStatus {
    pub state: TaskState,

    /// ISO-8601 timestamp of the transition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// Optional agent message explaining the state
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
}

impl TaskStatus {
    /// Create a status stamped with the current time
    pub fn new(state: TaskState) -> Self {
        Self {
            state,
            timestamp: Some(Utc::now().to_rfc3339()),
            message: None,
        }
    }
}

/// Task state in the A2A protocol lifecycle
///
/// Task lifecycle: submitted → working → completed/failed/canceled/rejected
/// Non-terminal states: input-required, auth-required (awaiting client input)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    Submitted,
    Working,
    InputRequired,
    AuthRequired,
    Completed,
    Failed,
    Canceled,
    Rejected,
    Unknown,
}

impl TaskState {
    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskState::Completed | TaskState::Failed | TaskState::Canceled | TaskState::Rejected
        )
    }

    /// Check if this state requires client action
    pub fn requires_action(&self) -> bool {
        matches!(self, TaskState::InputRequired | TaskState::AuthRequired)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::Submitted => "submitted",
            TaskState::Working => "working",
            TaskState::InputRequired => "input-required",
            TaskState::AuthRequired => "auth-required",
            TaskState::Completed => "completed",
            TaskState::Failed => "failed",
            TaskState::Canceled => "canceled",
            TaskState::Rejected => "rejected",
            TaskState::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Streaming event announcing a task state transition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskStatusUpdateEvent {
    #[serde(default = "status_update_kind")]
    pub kind: String,

    #[serde(rename = "taskId")]
    pub task_id: String,

    #[serde(rename = "contextId", default, skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,

    pub status: TaskStatus,

    /// Whether this is the last event of the stream
    #[serde(rename = "final", default)]
    pub is_final: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

/// Streaming event carrying a (possibly partial) artifact
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskArtifactUpdateEvent {
    #[serde(default = "artifact_update_kind")]
    pub kind: String,

    #[serde(rename = "taskId")]
    pub task_id: String,

    #[serde(rename = "contextId", default, skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,

    pub artifact: Artifact,

    /// Append these parts to a previously sent artifact with the same id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub append: Option<bool>,

    #[serde(rename = "lastChunk", default, skip_serializing_if = "Option::is_none")]
    pub last_chunk: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

/// Parameters of `message/send` and `message/stream`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageSendParams {
    /// The message to send
    pub message: Message,

    /// Context id supplied next to the message rather than inside it
    #[serde(rename = "contextId", default, skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<MessageSendConfiguration>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl MessageSendParams {
    pub fn new(message: Message) -> Self {
        Self {
            message,
            context_id: None,
            configuration: None,
            metadata: None,
        }
    }
}

/// Delivery preferences attached to a send request
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MessageSendConfiguration {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accepted_output_modes: Vec<String>,

    /// Wait for a terminal state before answering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocking: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_length: Option<u32>,
}

/// Parameters of `tasks/get` and `tasks/cancel`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskIdParams {
    #[serde(alias = "taskId", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "historyLength", default, skip_serializing_if = "Option::is_none")]
    pub history_length: Option<u32>,
}
