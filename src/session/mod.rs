//! Conversation to context-id mapping
//!
//! A conversation is whatever the chat side uses to group turns (a channel,
//! a thread, a console session). The remote agent knows it only by the context
//! id it handed out on the previous turn.

mod lock;
mod memory;

pub use lock::ConversationLocks;
pub use memory::InMemorySessionStore;

use async_trait::async_trait;

use crate::protocol::error::A2AError;

/// Storage for the context id of each conversation
///
/// Absence of an entry means the next turn starts a fresh remote session.
/// Callers serialize access per conversation with [`ConversationLocks`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, conversation_id: &str) -> Result<Option<String>, A2AError>;

    /// Insert or overwrite the context id of a conversation
    async fn put(&self, conversation_id: &str, context_id: &str) -> Result<(), A2AError>;

    /// Forget a conversation. Returns whether an entry existed.
    async fn delete(&self, conversation_id: &str) -> Result<bool, A2AError>;
}
