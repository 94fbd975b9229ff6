//! High-level A2A agent client

use tower::ServiceExt;
use tower_service::Service;

use crate::{
    client::config::ClientConfig,
    protocol::{A2AError, A2AOperation, AgentCard, Message, ProtocolEvent, Task},
    service::{A2ARequest, A2AResponse, EventStream, RequestContext},
};

/// Result of a unary `message/send`
#[derive(Debug, Clone, PartialEq)]
pub enum SendResult {
    /// The agent answered directly
    Message(Message),

    /// The agent ran a task
    Task(Task),
}

impl SendResult {
    /// The events a stream would have delivered for this result
    pub fn into_events(self) -> Vec<ProtocolEvent> {
        match self {
            SendResult::Message(message) => vec![ProtocolEvent::TextMessage(message)],
            SendResult::Task(task) => ProtocolEvent::from_task(task),
        }
    }
}

/// High-level A2A client for interacting with agents
///
/// This client wraps a Tower service and provides convenient methods for the
/// A2A operations. Each call clones the service, so a client can be shared
/// freely between concurrent turns.
///
/// # Example
///
/// ```rust,no_run
/// use a2a_bridge::prelude::*;
///
/// # async fn example() -> Result<(), A2AError> {
/// let url = "https://agent.example.com/api/a2a/homelab".parse().unwrap();
/// let client = A2AClientBuilder::new_http(url).build()?;
///
/// let card = client.discover().await?;
/// let client = client.with_rpc_url(Some(card.url));
/// let reply = client.send_message(Message::user("Hello, agent!")).await?;
/// println!("{:?}", reply);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AgentClient<S> {
    service: S,
    config: ClientConfig,
}

impl<S> AgentClient<S>
where
    S: Service<A2ARequest, Response = A2AResponse, Error = A2AError> + Clone + Send,
    S::Future: Send,
{
    pub fn new(service: S, config: ClientConfig) -> Self {
        Self { service, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// A client whose JSON-RPC calls go to `rpc_url` instead of the base URL
    pub fn with_rpc_url(mut self, rpc_url: Option<String>) -> Self {
        self.config = self.config.with_rpc_url(rpc_url);
        self
    }

    fn build_context(&self) -> RequestContext {
        RequestContext {
            rpc_url: self.config.rpc_url.clone(),
            auth: None, // Set by AuthLayer
            timeout: Some(self.config.timeout),
            metadata: Default::default(),
        }
    }

    async fn call(&self, operation: A2AOperation) -> Result<A2AResponse, A2AError> {
        let request = A2ARequest::new(operation, self.build_context());
        let mut service = self.service.clone();
        service.ready().await?.call(request).await
    }

    /// Fetch the agent card from `.well-known/agent-card.json` below the base URL
    pub async fn discover(&self) -> Result<AgentCard, A2AError> {
        match self.call(A2AOperation::DiscoverAgent).await? {
            A2AResponse::AgentCard(card) => Ok(*card),
            other => Err(unexpected("discover", &other)),
        }
    }

    /// Send a message with `message/send` and wait for the outcome
    pub async fn send_message(&self, message: Message) -> Result<SendResult, A2AError> {
        let operation = A2AOperation::SendMessage {
            message,
            stream: false,
        };

        match self.call(operation).await? {
            A2AResponse::Task(task) => Ok(SendResult::Task(*task)),
            A2AResponse::Message(message) => Ok(SendResult::Message(*message)),
            other => Err(unexpected("send_message", &other)),
        }
    }

    /// Send a message with `message/stream`
    ///
    /// Resolves once the agent accepted the request; events are read from the
    /// returned stream.
    pub async fn stream_message(&self, message: Message) -> Result<EventStream, A2AError> {
        let operation = A2AOperation::SendMessage {
            message,
            stream: true,
        };

        match self.call(operation).await? {
            A2AResponse::Events(events) => Ok(events),
            other => Err(unexpected("stream_message", &other)),
        }
    }

    /// Send a message, streaming when `streaming` is set and expanding the
    /// unary result into events otherwise
    pub async fn message_events(
        &self,
        message: Message,
        streaming: bool,
    ) -> Result<EventStream, A2AError> {
        if streaming {
            return self.stream_message(message).await;
        }

        let events = self.send_message(message).await?.into_events();
        Ok(Box::pin(futures::stream::iter(events.into_iter().map(Ok::<_, A2AError>))))
    }

    pub async fn get_task(&self, task_id: impl Into<String>) -> Result<Task, A2AError> {
        let operation = A2AOperation::GetTask {
            task_id: task_id.into(),
        };

        match self.call(operation).await? {
            A2AResponse::Task(task) => Ok(*task),
            other => Err(unexpected("get_task", &other)),
        }
    }

    pub async fn cancel_task(&self, task_id: impl Into<String>) -> Result<Task, A2AError> {
        let operation = A2AOperation::CancelTask {
            task_id: task_id.into(),
        };

        match self.call(operation).await? {
            A2AResponse::Task(task) => Ok(*task),
            other => Err(unexpected("cancel_task", &other)),
        }
    }
}

fn unexpected(operation: &str, response: &A2AResponse) -> A2AError {
    A2AError::Protocol(format!(
        "Unexpected response from {}: {:?}",
        operation, response
    ))
}
