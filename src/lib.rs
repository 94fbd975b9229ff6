//! # A2A Bridge
//!
//! A Tower-based bridge between chat surfaces and Agent2Agent (A2A) agents.
//!
//! The crate has two halves:
//!
//! - **Client adapter**: [`bridge::AgentBridge`] relays one chat turn to a
//!   remote agent, keeps the agent's context id per conversation in a
//!   [`session::SessionStore`] and returns the collected reply. Requests go
//!   through a Tower stack (validation, auth, protocol service) over a
//!   pluggable [`transport::Transport`].
//! - **Task server**: [`server`] exposes a JSON-RPC 2.0 A2A endpoint on axum
//!   whose work is done by an [`server::AgentProcessor`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::{sync::Arc, time::Duration};
//!
//! use a2a_bridge::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let url = "http://kagent:8083/api/a2a/kagent/homelab".parse()?;
//!     let client = A2AClientBuilder::new_http(url)
//!         .with_bearer_auth("token123")
//!         .with_timeout(Duration::from_secs(300))
//!         .build()?;
//!
//!     let bridge = AgentBridge::new(client, Arc::new(InMemorySessionStore::new()));
//!     for chunk in bridge.handle_turn("channel-42", "Are all nodes ready?").await? {
//!         println!("{}", chunk);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod bridge;
pub mod chunk;
pub mod client;
pub mod codec;
pub mod layer;
pub mod protocol;
pub mod server;
pub mod service;
pub mod session;
pub mod transport;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        bridge::AgentBridge,
        chunk::split_by_lines,
        client::{A2AClientBuilder, AgentClient},
        protocol::error::A2AError,
        protocol::{AgentCard, Message, Part, ProtocolEvent, Role, Task, TaskState, TaskStatus},
        server::{AgentProcessor, ProcessRequest, ServerConfig},
        session::{InMemorySessionStore, SessionStore},
    };
}
