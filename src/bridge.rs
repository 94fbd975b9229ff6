//! Relaying chat turns to a remote A2A agent
//!
//! [`AgentBridge`] turns one line of user text into one reply, keeping the
//! remote agent's context id per conversation so follow-up turns land in the
//! same remote session.

use std::{sync::Arc, time::Instant};

use futures::StreamExt;
use tower_service::Service;
use uuid::Uuid;

use crate::{
    chunk::{split_by_lines, DEFAULT_MAX_MESSAGE_LENGTH},
    client::{
        classifier::{classify, preview, Signal},
        AgentClient,
    },
    protocol::{error::A2AError, message::Message},
    service::{A2ARequest, A2AResponse},
    session::{ConversationLocks, SessionStore},
};

/// Reply used when the agent finished without producing any text
pub const EMPTY_REPLY: &str = "I couldn't generate a response. Please try again.";

/// Reply shown to chat users when a turn failed
pub const ERROR_REPLY: &str = "I encountered an error. Please try again.";

pub const SESSION_CLEARED: &str = "Session cleared. Starting fresh.";
pub const NO_SESSION: &str = "No active session to clear.";

const RESET_COMMANDS: [&str; 3] = ["!reset", "!clear", "!new"];

/// Whether `text` asks to forget the conversation's remote session
pub fn is_reset_command(text: &str) -> bool {
    let text = text.trim().to_lowercase();
    RESET_COMMANDS.contains(&text.as_str())
}

const HISTORY_ENTRY_CHARS: usize = 200;

/// An earlier chat line shown to the agent as context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLine {
    pub author: String,
    pub content: String,
}

impl ChatLine {
    pub fn new(author: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            content: content.into(),
        }
    }
}

/// Prefix the current message with recent conversation, oldest first
///
/// Each earlier line is cut to 200 characters.
pub fn compose_prompt<'a>(
    recent: impl IntoIterator<Item = &'a ChatLine>,
    author: &str,
    content: &str,
) -> String {
    let history: Vec<String> = recent
        .into_iter()
        .map(|line| {
            let mut text: String = line.content.chars().take(HISTORY_ENTRY_CHARS).collect();
            if line.content.chars().count() > HISTORY_ENTRY_CHARS {
                text.push_str("...");
            }
            format!("{}: {}", line.author, text)
        })
        .collect();

    let current = format!("Current message from {}: {}", author, content);
    if history.is_empty() {
        current
    } else {
        format!("Recent conversation:\n{}\n\n{}", history.join("\n"), current)
    }
}

/// Client adapter between a chat surface and a remote A2A agent
pub struct AgentBridge<S> {
    client: AgentClient<S>,
    sessions: Arc<dyn SessionStore>,
    locks: ConversationLocks,
    max_message_length: usize,
}

impl<S> AgentBridge<S>
where
    S: Service<A2ARequest, Response = A2AResponse, Error = A2AError> + Clone + Send + Sync,
    S::Future: Send,
{
    pub fn new(client: AgentClient<S>, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            client,
            sessions,
            locks: ConversationLocks::new(),
            max_message_length: DEFAULT_MAX_MESSAGE_LENGTH,
        }
    }

    pub fn with_max_message_length(mut self, max_message_length: usize) -> Self {
        self.max_message_length = max_message_length;
        self
    }

    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.sessions
    }

    fn agent_url(&self) -> String {
        self.client.config().agent_url.to_string()
    }

    fn unreachable(&self, err: A2AError) -> A2AError {
        A2AError::AgentUnreachable {
            agent_url: self.agent_url(),
            reason: err.to_string(),
        }
    }

    /// Send `text` to the remote agent and return its reply
    ///
    /// The agent card is fetched on every call. The context id reported by the
    /// agent is stored for `conversation_id` once the response has been read
    /// completely. A failure while reading discards everything received so far.
    ///
    /// Callers serialize calls per conversation; [`AgentBridge::handle_turn`]
    /// does so.
    ///
    /// # Errors
    ///
    /// [`A2AError::AgentUnreachable`] if discovery or the request fails,
    /// [`A2AError::AgentError`] if the agent fails while answering.
    pub async fn call_agent(&self, text: &str, conversation_id: &str) -> Result<String, A2AError> {
        let card = self.client.discover().await.map_err(|err| {
            tracing::error!(agent_url = %self.agent_url(), error = %err, "Agent discovery failed");
            self.unreachable(err)
        })?;
        tracing::debug!(agent = %card.name, streaming = card.capabilities.streaming, "Got agent card");

        let client = self
            .client
            .clone()
            .with_rpc_url(Some(card.url.clone()));

        let existing_context = self.sessions.get(conversation_id).await?;
        if existing_context.is_some() {
            tracing::debug!(conversation_id, "Using existing context");
        }

        let message = Message::user(text)
            .with_message_id(Uuid::new_v4().to_string())
            .with_context_id(existing_context);

        tracing::info!(conversation_id, preview = %preview(text), "Sending to agent");

        let mut events = client
            .message_events(message, card.capabilities.streaming)
            .await
            .map_err(|err| {
                tracing::error!(conversation_id, error = %err, "Agent request failed");
                if err.is_connectivity() {
                    self.unreachable(err)
                } else {
                    A2AError::AgentError(err.to_string())
                }
            })?;

        let mut fragments = Vec::new();
        let mut latest_context = None;

        while let Some(event) = events.next().await {
            let event = event.map_err(|err| {
                tracing::error!(conversation_id, error = %err, "Agent stream failed");
                A2AError::AgentError(err.to_string())
            })?;

            for signal in classify(&event) {
                match signal {
                    Signal::Text(text) => fragments.push(text),
                    Signal::ContextUpdate(context_id) => latest_context = Some(context_id),
                    Signal::Terminal(_) | Signal::Progress(_) => {}
                }
            }
        }

        if let Some(context_id) = latest_context {
            tracing::debug!(conversation_id, context_id = %context_id, "Storing context");
            self.sessions.put(conversation_id, &context_id).await?;
        }

        if fragments.is_empty() {
            tracing::warn!(conversation_id, "No text extracted from agent response");
            return Ok(EMPTY_REPLY.to_string());
        }

        Ok(fragments.join("\n"))
    }

    /// [`AgentBridge::call_agent`] under the conversation's lock
    pub async fn relay(&self, conversation_id: &str, text: &str) -> Result<String, A2AError> {
        let _guard = self.locks.acquire(conversation_id).await;
        self.call_agent(text, conversation_id).await
    }

    /// Forget the remote session of a conversation
    ///
    /// Returns whether a session existed.
    pub async fn reset(&self, conversation_id: &str) -> Result<bool, A2AError> {
        let _guard = self.locks.acquire(conversation_id).await;
        self.clear(conversation_id).await
    }

    async fn clear(&self, conversation_id: &str) -> Result<bool, A2AError> {
        let cleared = self.sessions.delete(conversation_id).await?;
        if cleared {
            tracing::info!(conversation_id, "Session reset");
        }
        Ok(cleared)
    }

    /// Run one chat turn under the conversation's lock and return the reply
    /// split for the chat transport
    ///
    /// Reset commands are answered locally without contacting the agent.
    pub async fn handle_turn(
        &self,
        conversation_id: &str,
        text: &str,
    ) -> Result<Vec<String>, A2AError> {
        let _guard = self.locks.acquire(conversation_id).await;

        if is_reset_command(text) {
            let reply = if self.clear(conversation_id).await? {
                SESSION_CLEARED
            } else {
                NO_SESSION
            };
            return Ok(vec![reply.to_string()]);
        }

        let started = Instant::now();
        let reply = self.call_agent(text, conversation_id).await?;
        tracing::info!(
            conversation_id,
            elapsed_ms = started.elapsed().as_millis() as u64,
            chars = reply.chars().count(),
            "Response received"
        );

        let chunks = split_by_lines(&reply, self.max_message_length);
        if chunks.len() > 1 {
            tracing::info!(conversation_id, chunks = chunks.len(), "Splitting response");
        }
        Ok(chunks)
    }
}
