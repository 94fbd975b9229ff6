//! A2A protocol operations

use super::message::Message;

/// Path of the agent card relative to the agent base URL
pub const AGENT_CARD_PATH: &str = ".well-known/agent-card.json";

/// A2A protocol operations
///
/// Binding-independent operations a client can issue against a remote agent.
/// Over the JSON-RPC binding every operation except discovery is a `POST`
/// to the agent's JSON-RPC endpoint.
#[derive(Debug, Clone)]
pub enum A2AOperation {
    /// Send a message to an agent
    SendMessage {
        /// The message to send; carries its own context id
        message: Message,

        /// Ask for a Server-Sent-Events stream (`message/stream`)
        stream: bool,
    },

    /// Get a task by ID
    GetTask { task_id: String },

    /// Cancel a task
    CancelTask { task_id: String },

    /// Discover agent capabilities (fetch Agent Card)
    DiscoverAgent,
}

impl A2AOperation {
    /// Endpoint path relative to the agent base URL
    pub fn endpoint(&self) -> &'static str {
        match self {
            A2AOperation::DiscoverAgent => AGENT_CARD_PATH,
            _ => "",
        }
    }

    /// Get the HTTP method for this operation
    pub fn method(&self) -> &'static str {
        match self {
            A2AOperation::DiscoverAgent => "GET",
            _ => "POST",
        }
    }

    /// Whether this operation goes through the JSON-RPC envelope
    pub fn is_json_rpc(&self) -> bool {
        !matches!(self, A2AOperation::DiscoverAgent)
    }

    /// Check if this operation expects a streaming response
    pub fn is_streaming(&self) -> bool {
        matches!(self, A2AOperation::SendMessage { stream: true, .. })
    }
}
