//! Client configuration

use std::time::Duration;

use url::Url;

use crate::transport::ensure_trailing_slash;

/// Remote agents may delegate through several hops before answering.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Configuration for an A2A client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the agent, always ending with `/`
    pub agent_url: Url,

    /// JSON-RPC endpoint taken from the agent card
    pub rpc_url: Option<String>,

    /// Upper bound for one request, streamed body included
    pub timeout: Duration,

    /// Enable response validation
    pub validate_responses: bool,
}

impl ClientConfig {
    pub fn new(agent_url: Url) -> Self {
        Self {
            agent_url: ensure_trailing_slash(agent_url),
            rpc_url: None,
            timeout: DEFAULT_TIMEOUT,
            validate_responses: true,
        }
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_rpc_url(mut self, rpc_url: Option<String>) -> Self {
        self.rpc_url = rpc_url.filter(|url| !url.trim().is_empty());
        self
    }

    /// Enable or disable response validation
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validate_responses = enabled;
        self
    }
}
