//! The work behind `message/send`

use std::sync::Arc;

use tokio::runtime::Handle;
use tower_service::Service;

use crate::{
    bridge::AgentBridge,
    protocol::error::A2AError,
    service::{A2ARequest, A2AResponse},
};

/// One `message/send` as seen by an [`AgentProcessor`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRequest {
    pub task_id: String,
    pub context_id: String,

    /// Text parts of the message, space-joined and trimmed
    pub text: String,

    /// Whether the caller supplied the context id
    pub continued: bool,
}

/// Synchronous request processing
///
/// Runs on the blocking thread pool, one call per request, possibly several
/// at once. An `Err` is reported to the caller as a failed task.
pub trait AgentProcessor: Send + Sync + 'static {
    fn process(&self, request: &ProcessRequest) -> anyhow::Result<String>;
}

impl<F> AgentProcessor for F
where
    F: Fn(&ProcessRequest) -> anyhow::Result<String> + Send + Sync + 'static,
{
    fn process(&self, request: &ProcessRequest) -> anyhow::Result<String> {
        self(request)
    }
}

/// Answers requests by relaying them to a remote agent
///
/// The request's context id doubles as the bridge conversation id, so a
/// caller that keeps its context id keeps its remote session.
pub struct RelayProcessor<S> {
    bridge: Arc<AgentBridge<S>>,
    runtime: Handle,
}

impl<S> RelayProcessor<S> {
    /// `runtime` drives the bridge from the blocking pool
    pub fn new(bridge: Arc<AgentBridge<S>>, runtime: Handle) -> Self {
        Self { bridge, runtime }
    }
}

impl<S> AgentProcessor for RelayProcessor<S>
where
    S: Service<A2ARequest, Response = A2AResponse, Error = A2AError>
        + Clone
        + Send
        + Sync
        + 'static,
    S::Future: Send,
{
    fn process(&self, request: &ProcessRequest) -> anyhow::Result<String> {
        let reply = self
            .runtime
            .block_on(self.bridge.relay(&request.context_id, &request.text))?;
        Ok(reply)
    }
}
