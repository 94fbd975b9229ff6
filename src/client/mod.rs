//! High-level client API for A2A protocol

pub mod agent;
pub mod builder;
pub mod classifier;
pub mod config;

pub use agent::{AgentClient, SendResult};
pub use builder::{A2AClient, A2AClientBuilder, A2AService};
pub use classifier::{classify, Signal};
pub use config::ClientConfig;
