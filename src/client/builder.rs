//! Client builder for constructing A2A clients with composable layers

use std::{sync::Arc, time::Duration};

use tower::ServiceBuilder;
use url::Url;

use crate::{
    client::{AgentClient, ClientConfig},
    codec::JsonRpcCodec,
    layer::{A2AValidationLayer, A2AValidationService, AuthCredentials, AuthLayer, AuthService},
    protocol::A2AError,
    service::A2AProtocolService,
    transport::{HttpTransport, Transport},
};

/// The service stack assembled by [`A2AClientBuilder::build`]
pub type A2AService<T> = A2AValidationService<AuthService<A2AProtocolService<T>>>;

/// Client produced by [`A2AClientBuilder`]
pub type A2AClient<T> = AgentClient<A2AService<T>>;

/// Builder for constructing A2A clients
///
/// # Example
///
/// ```rust,no_run
/// use a2a_bridge::prelude::*;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let url = "https://agent.example.com".parse().unwrap();
/// let client = A2AClientBuilder::new_http(url)
///     .with_bearer_auth("token123")
///     .with_timeout(Duration::from_secs(60))
///     .build()?;
///
/// let agent_card = client.discover().await?;
/// println!("Connected to: {}", agent_card.name);
/// # Ok(())
/// # }
/// ```
pub struct A2AClientBuilder<T: Transport> {
    config: ClientConfig,
    transport: Option<T>,
    auth: Option<AuthCredentials>,
}

impl<T: Transport> A2AClientBuilder<T> {
    pub fn new(agent_url: Url) -> Self {
        Self {
            config: ClientConfig::new(agent_url),
            transport: None,
            auth: None,
        }
    }

    /// Use a custom transport
    pub fn with_transport(mut self, transport: T) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_bearer_auth(mut self, token: impl Into<String>) -> Self {
        self.auth = Some(AuthCredentials::bearer(token));
        self
    }

    /// Send `key` in the `header` header
    pub fn with_api_key_auth(mut self, key: impl Into<String>, header: impl Into<String>) -> Self {
        self.auth = Some(AuthCredentials::api_key(key, header));
        self
    }

    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.auth = Some(AuthCredentials::basic(username, password));
        self
    }

    /// Set or clear authentication credentials
    pub fn with_auth(mut self, credentials: Option<AuthCredentials>) -> Self {
        self.auth = credentials;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_timeout(timeout);
        self
    }

    /// Enable or disable request and response validation (default: enabled)
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.config = self.config.with_validation(enabled);
        self
    }

    /// Assemble the layers around the protocol service
    ///
    /// # Errors
    ///
    /// Returns an error if no transport has been configured
    pub fn build(self) -> Result<A2AClient<T>, A2AError> {
        let transport = self.transport.ok_or_else(|| {
            A2AError::Protocol("Transport not configured. Call with_transport()".into())
        })?;

        let validation = if self.config.validate_responses {
            A2AValidationLayer::new()
        } else {
            A2AValidationLayer::disabled()
        };

        let service = ServiceBuilder::new()
            .layer(validation)
            .layer(AuthLayer::optional(self.auth))
            .service(A2AProtocolService::new(
                transport,
                Arc::new(JsonRpcCodec::new()),
            ));

        Ok(AgentClient::new(service, self.config))
    }
}

impl A2AClientBuilder<HttpTransport> {
    /// Create a builder for the HTTP JSON-RPC binding
    ///
    /// The transport timeout is applied per request from the client config.
    pub fn new_http(agent_url: Url) -> Self {
        let transport = HttpTransport::new(agent_url.clone());
        Self::new(agent_url).with_transport(transport)
    }
}
