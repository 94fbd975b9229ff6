//! Event classification
//!
//! Reduces each [`ProtocolEvent`] to the few signals the bridge acts on.

use crate::protocol::{task::TaskState, ProtocolEvent};

/// What an event means for the reply being assembled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    /// Reply text, in arrival order
    Text(String),

    /// Context id to reuse on the next turn
    ContextUpdate(String),

    /// The task finished as completed, failed or canceled
    Terminal(TaskState),

    /// Any other state transition
    Progress(TaskState),
}

/// Classify one event. Never fails; unrecognized events yield no signals.
pub fn classify(event: &ProtocolEvent) -> Vec<Signal> {
    match event {
        ProtocolEvent::TextMessage(message) => {
            let text = message.text();
            if text.is_empty() {
                tracing::debug!("Agent message carried no text");
                return Vec::new();
            }
            tracing::debug!(preview = %preview(&text), "Message text");
            vec![Signal::Text(text)]
        }
        ProtocolEvent::TaskSnapshot(task) => {
            tracing::debug!(task_id = %task.id, "Initial task event");
            context_signal(task)
        }
        ProtocolEvent::TaskArtifact { task, update } => {
            let mut signals = context_signal(task);
            let text = update.artifact.text_content();
            if !text.is_empty() {
                tracing::debug!(task_id = %task.id, preview = %preview(&text), "Artifact text");
                signals.push(Signal::Text(text));
            }
            signals
        }
        ProtocolEvent::TaskStatus { task, update } => {
            let mut signals = context_signal(task);
            let state = update.status.state;
            match state {
                TaskState::Completed | TaskState::Failed | TaskState::Canceled => {
                    tracing::info!(task_id = %task.id, state = %state, "Task finished");
                    signals.push(Signal::Terminal(state));
                }
                _ => {
                    tracing::debug!(task_id = %task.id, state = %state, "Task status");
                    signals.push(Signal::Progress(state));
                }
            }
            signals
        }
        ProtocolEvent::Unknown(value) => {
            tracing::warn!(event = %preview(&value.to_string()), "Unknown A2A event");
            Vec::new()
        }
    }
}

fn context_signal(task: &crate::protocol::Task) -> Vec<Signal> {
    task.context_anchor()
        .map(|id| vec![Signal::ContextUpdate(id.to_string())])
        .unwrap_or_default()
}

/// First 100 characters of `text`, for log lines
pub fn preview(text: &str) -> String {
    const LIMIT: usize = 100;
    match text.char_indices().nth(LIMIT) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
