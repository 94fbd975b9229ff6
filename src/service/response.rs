//! A2A service response types

use std::{fmt, pin::Pin};

use futures::Stream;

use crate::protocol::{agent::AgentCard, error::A2AError, message::Message, task::Task, ProtocolEvent};

/// Events of a `message/stream` call, in arrival order
pub type EventStream = Pin<Box<dyn Stream<Item = Result<ProtocolEvent, A2AError>> + Send>>;

/// Response from an A2A service operation
pub enum A2AResponse {
    /// Task response (from SendMessage, GetTask, CancelTask)
    Task(Box<Task>),

    /// Direct message reply (from SendMessage)
    Message(Box<Message>),

    /// Agent card response (from DiscoverAgent)
    AgentCard(Box<AgentCard>),

    /// Event stream (from a streaming SendMessage)
    Events(EventStream),

    /// Empty response (for operations with no return value)
    Empty,
}

impl A2AResponse {
    /// Extract a task from the response, if present
    pub fn into_task(self) -> Option<Task> {
        match self {
            A2AResponse::Task(task) => Some(*task),
            _ => None,
        }
    }

    /// Extract an agent card from the response, if present
    pub fn into_agent_card(self) -> Option<AgentCard> {
        match self {
            A2AResponse::AgentCard(card) => Some(*card),
            _ => None,
        }
    }

    pub fn into_events(self) -> Option<EventStream> {
        match self {
            A2AResponse::Events(events) => Some(events),
            _ => None,
        }
    }

    /// Check if the response is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, A2AResponse::Empty)
    }
}

impl fmt::Debug for A2AResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            A2AResponse::Task(task) => f.debug_tuple("Task").field(task).finish(),
            A2AResponse::Message(message) => f.debug_tuple("Message").field(message).finish(),
            A2AResponse::AgentCard(card) => f.debug_tuple("AgentCard").field(card).finish(),
            A2AResponse::Events(_) => f.write_str("Events(..)"),
            A2AResponse::Empty => f.write_str("Empty"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_task() {
        let task = Task::new("task-123", None);
        let response = A2AResponse::Task(Box::new(task));

        let extracted = response.into_task();
        assert_eq!(extracted.unwrap().id, "task-123");
    }

    #[test]
    fn test_response_events_debug() {
        let response = A2AResponse::Events(Box::pin(futures::stream::empty()));
        assert_eq!(format!("{:?}", response), "Events(..)");
        assert!(response.into_task().is_none());
    }

    #[test]
    fn test_response_empty() {
        let response = A2AResponse::Empty;
        assert!(response.is_empty());
    }
}
