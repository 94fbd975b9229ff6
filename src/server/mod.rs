//! Local A2A endpoint over axum
//!
//! Answers JSON-RPC `message/send` requests synchronously through an
//! [`AgentProcessor`] supplied by the host.

pub mod card;
pub mod config;
pub mod handler;
pub mod processor;
pub mod router;

pub use card::build_agent_card;
pub use config::ServerConfig;
pub use processor::{AgentProcessor, ProcessRequest, RelayProcessor};
pub use router::{build_router, serve, ServerState};
