//! Validation layer for A2A protocol requests and responses

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use tower_layer::Layer;
use tower_service::Service;

use crate::{
    protocol::{error::A2AError, message::Part, operation::A2AOperation},
    service::{A2ARequest, A2AResponse},
};

/// Layer that validates A2A protocol requests and responses
///
/// Streamed events are not inspected; the stream decoder already degrades
/// malformed payloads to unknown events.
#[derive(Clone, Debug)]
pub struct A2AValidationLayer {
    enabled: bool,
}

impl A2AValidationLayer {
    pub fn new() -> Self {
        Self { enabled: true }
    }

    /// A layer that forwards everything unchecked
    pub fn disabled() -> Self {
        Self { enabled: false }
    }
}

impl Default for A2AValidationLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Layer<S> for A2AValidationLayer {
    type Service = A2AValidationService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        A2AValidationService {
            inner,
            enabled: self.enabled,
        }
    }
}

/// Validation service that wraps an inner service
#[derive(Clone, Debug)]
pub struct A2AValidationService<S> {
    inner: S,
    enabled: bool,
}

impl<S> A2AValidationService<S> {
    fn validate_request(req: &A2ARequest) -> Result<(), A2AError> {
        match &req.operation {
            A2AOperation::SendMessage { message, .. } => {
                if message.parts.is_empty() {
                    return Err(A2AError::Validation(
                        "Message must have at least one part".into(),
                    ));
                }

                for part in &message.parts {
                    match part {
                        Part::Text { text } if text.is_empty() => {
                            return Err(A2AError::Validation("Text part cannot be empty".into()));
                        }
                        Part::File { file } if file.uri.is_none() && file.bytes.is_none() => {
                            return Err(A2AError::Validation(
                                "File must have either URI or bytes content".into(),
                            ));
                        }
                        _ => {}
                    }
                }
            }
            A2AOperation::GetTask { task_id } | A2AOperation::CancelTask { task_id } => {
                if task_id.trim().is_empty() {
                    return Err(A2AError::Validation("Task ID cannot be empty".into()));
                }
            }
            A2AOperation::DiscoverAgent => {}
        }

        if let Some(rpc_url) = &req.context.rpc_url {
            if rpc_url.trim().is_empty() {
                return Err(A2AError::Validation("RPC URL cannot be empty".into()));
            }
        }

        Ok(())
    }

    fn validate_response(resp: &A2AResponse) -> Result<(), A2AError> {
        match resp {
            A2AResponse::Task(task) if task.id.is_empty() => {
                Err(A2AError::Validation("Task ID cannot be empty".into()))
            }
            A2AResponse::AgentCard(card) if card.name.trim().is_empty() => {
                Err(A2AError::Validation("Agent name cannot be empty".into()))
            }
            _ => Ok(()),
        }
    }
}

impl<S> Service<A2ARequest> for A2AValidationService<S>
where
    S: Service<A2ARequest, Response = A2AResponse, Error = A2AError> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = A2AResponse;
    type Error = A2AError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: A2ARequest) -> Self::Future {
        let enabled = self.enabled;
        if enabled {
            if let Err(e) = Self::validate_request(&req) {
                return Box::pin(async move { Err(e) });
            }
        }

        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        Box::pin(async move {
            let response = inner.call(req).await?;
            if enabled {
                Self::validate_response(&response)?;
            }
            Ok(response)
        })
    }
}
