//! Pairing of streamed task updates with the task they belong to

use crate::protocol::{
    task::{Task, TaskArtifactUpdateEvent},
    ProtocolEvent, StreamResponse,
};

/// Folds the results of one `message/stream` call into [`ProtocolEvent`]s
///
/// The tracker keeps the latest known state of the task so that every update
/// can be delivered together with its task. Updates that arrive before any
/// task snapshot start a task of their own.
#[derive(Debug, Default)]
pub struct TaskTracker {
    task: Option<Task>,
}

impl TaskTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest task state seen on the stream
    pub fn task(&self) -> Option<&Task> {
        self.task.as_ref()
    }

    pub fn observe(&mut self, response: StreamResponse) -> ProtocolEvent {
        match response {
            StreamResponse::Message(message) => ProtocolEvent::TextMessage(message),
            StreamResponse::Task(task) => {
                self.task = Some(task.clone());
                ProtocolEvent::TaskSnapshot(task)
            }
            StreamResponse::StatusUpdate(update) => {
                let task = self.task_for(&update.task_id, update.context_id.as_deref());
                task.status = update.status.clone();
                ProtocolEvent::TaskStatus {
                    task: task.clone(),
                    update,
                }
            }
            StreamResponse::ArtifactUpdate(update) => {
                let task = self.task_for(&update.task_id, update.context_id.as_deref());
                merge_artifact(task, &update);
                ProtocolEvent::TaskArtifact {
                    task: task.clone(),
                    update,
                }
            }
            StreamResponse::Unknown(value) => ProtocolEvent::Unknown(value),
        }
    }

    fn task_for(&mut self, task_id: &str, context_id: Option<&str>) -> &mut Task {
        let stale = self.task.as_ref().is_some_and(|task| task.id != task_id);
        if stale {
            self.task = None;
        }

        let task = self
            .task
            .get_or_insert_with(|| Task::new(task_id, context_id.map(str::to_owned)));
        if task.context_id.is_none() {
            task.context_id = context_id.map(str::to_owned);
        }
        task
    }
}

fn merge_artifact(task: &mut Task, update: &TaskArtifactUpdateEvent) {
    let existing = task
        .artifacts
        .iter_mut()
        .find(|artifact| artifact.artifact_id == update.artifact.artifact_id);

    match existing {
        Some(artifact) if update.append == Some(true) => {
            artifact.parts.extend(update.artifact.parts.iter().cloned());
        }
        Some(artifact) => *artifact = update.artifact.clone(),
        None => task.artifacts.push(update.artifact.clone()),
    }
}
