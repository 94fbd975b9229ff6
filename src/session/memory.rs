use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::SessionStore;
use crate::protocol::error::A2AError;

/// Process-local [`SessionStore`]
///
/// Entries never expire. A deployment with more than one bridge instance
/// needs a shared store instead.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    contexts: RwLock<HashMap<String, String>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of conversations with a stored context
    pub async fn len(&self) -> usize {
        self.contexts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.contexts.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, conversation_id: &str) -> Result<Option<String>, A2AError> {
        Ok(self.contexts.read().await.get(conversation_id).cloned())
    }

    async fn put(&self, conversation_id: &str, context_id: &str) -> Result<(), A2AError> {
        self.contexts
            .write()
            .await
            .insert(conversation_id.to_string(), context_id.to_string());
        Ok(())
    }

    async fn delete(&self, conversation_id: &str) -> Result<bool, A2AError> {
        Ok(self.contexts.write().await.remove(conversation_id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = InMemorySessionStore::new();
        assert_eq!(store.get("chan-1").await.unwrap(), None);

        store.put("chan-1", "ctx-1").await.unwrap();
        store.put("chan-1", "ctx-2").await.unwrap();
        assert_eq!(store.get("chan-1").await.unwrap().as_deref(), Some("ctx-2"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = InMemorySessionStore::new();
        store.put("chan-1", "ctx-1").await.unwrap();

        assert!(store.delete("chan-1").await.unwrap());
        assert!(!store.delete("chan-1").await.unwrap());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_conversations_are_independent() {
        let store = InMemorySessionStore::new();
        store.put("chan-1", "ctx-1").await.unwrap();
        store.put("chan-2", "ctx-2").await.unwrap();
        store.delete("chan-1").await.unwrap();

        assert_eq!(store.get("chan-2").await.unwrap().as_deref(), Some("ctx-2"));
    }
}
