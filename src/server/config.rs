//! Settings of the local A2A endpoint

use crate::protocol::AgentSkill;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 10001;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,

    pub port: u16,

    /// URL advertised on the agent card; defaults to `http://localhost:{port}`
    pub base_url: Option<String>,

    pub name: String,
    pub description: String,
    pub version: String,
    pub skills: Vec<AgentSkill>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            base_url: None,
            name: "A2A Bridge".to_string(),
            description: "Relays A2A requests to a remote agent and returns its answer."
                .to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            skills: vec![AgentSkill::new(
                "conversation",
                "Conversational Assistant",
                "Answer questions and engage in helpful conversation",
            )],
        }
    }
}

impl ServerConfig {
    pub fn with_bind(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = host.into();
        self.port = port;
        self
    }

    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        self.base_url = base_url.filter(|url| !url.trim().is_empty());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_skill(mut self, skill: AgentSkill) -> Self {
        self.skills.push(skill);
        self
    }

    /// URL other agents use to reach this endpoint
    pub fn public_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{}", self.port))
    }

    /// Host and port to listen on; the host may be a name such as `localhost`
    pub fn bind_target(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }
}
