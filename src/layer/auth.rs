//! Credential injection for outgoing A2A requests

use std::{
    fmt,
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use base64::{engine::general_purpose, Engine as _};
use tower_layer::Layer;
use tower_service::Service;

use crate::{
    protocol::error::A2AError,
    service::{A2ARequest, A2AResponse},
};

/// Credentials presented to the remote agent
#[derive(Clone)]
pub enum AuthCredentials {
    /// `Authorization: Bearer <token>`
    Bearer(String),

    /// Token in a custom header
    ApiKey { key: String, header: String },

    /// `Authorization: Basic <base64(user:pass)>`
    Basic { username: String, password: String },
}

impl AuthCredentials {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer(token.into())
    }

    pub fn api_key(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self::ApiKey {
            key: key.into(),
            header: header.into(),
        }
    }

    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Header name and value carrying this credential
    pub fn to_header(&self) -> (String, String) {
        match self {
            AuthCredentials::Bearer(token) => {
                ("Authorization".to_string(), format!("Bearer {}", token))
            }
            AuthCredentials::ApiKey { key, header } => (header.clone(), key.clone()),
            AuthCredentials::Basic { username, password } => {
                let encoded =
                    general_purpose::STANDARD.encode(format!("{}:{}", username, password));
                ("Authorization".to_string(), format!("Basic {}", encoded))
            }
        }
    }
}

// Secrets stay out of logs.
impl fmt::Debug for AuthCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthCredentials::Bearer(_) => f.write_str("Bearer(***)"),
            AuthCredentials::ApiKey { header, .. } => {
                f.debug_struct("ApiKey").field("header", header).finish()
            }
            AuthCredentials::Basic { username, .. } => {
                f.debug_struct("Basic").field("username", username).finish()
            }
        }
    }
}

/// Layer that attaches credentials to every request
///
/// Built without credentials it passes requests through untouched, which is
/// how an agent that needs no token is reached.
#[derive(Clone, Debug, Default)]
pub struct AuthLayer {
    credentials: Option<AuthCredentials>,
}

impl AuthLayer {
    pub fn new(credentials: AuthCredentials) -> Self {
        Self::optional(Some(credentials))
    }

    pub fn optional(credentials: Option<AuthCredentials>) -> Self {
        Self { credentials }
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Self::new(AuthCredentials::bearer(token))
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            inner,
            credentials: self.credentials.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AuthService<S> {
    inner: S,
    credentials: Option<AuthCredentials>,
}

impl<S> Service<A2ARequest> for AuthService<S>
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

    fn call(&mut self, mut req: A2ARequest) -> Self::Future {
        // Explicit per-request credentials win.
        if req.context.auth.is_none() {
            req.context.auth = self.credentials.clone();
        }

        // The clone may not be ready; swap in the instance poll_ready was called on.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        Box::pin(async move { inner.call(req).await })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use tower::{service_fn, ServiceExt};

    use super::*;
    use crate::{protocol::operation::A2AOperation, service::RequestContext};

    #[test]
    fn test_bearer_credentials() {
        let (header, value) = AuthCredentials::bearer("test-token").to_header();
        assert_eq!(header, "Authorization");
        assert_eq!(value, "Bearer test-token");
    }

    #[test]
    fn test_basic_credentials() {
        let (header, value) = AuthCredentials::basic("user", "pass").to_header();
        assert_eq!(header, "Authorization");
        assert_eq!(value, "Basic dXNlcjpwYXNz");
    }

    #[test]
    fn test_debug_hides_secrets() {
        let rendered = format!("{:?}", AuthCredentials::bearer("s3cret"));
        assert!(!rendered.contains("s3cret"));
        let rendered = format!("{:?}", AuthCredentials::api_key("s3cret", "X-API-Key"));
        assert!(!rendered.contains("s3cret"));
    }

    async fn seen_auth(layer: AuthLayer, context: RequestContext) -> Option<String> {
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        let svc = layer.layer(service_fn(move |req: A2ARequest| {
            let sink = sink.clone();
            async move {
                *sink.lock().unwrap() = req.context.auth.map(|a| a.to_header().1);
                Ok::<_, A2AError>(A2AResponse::Empty)
            }
        }));

        svc.oneshot(A2ARequest::new(A2AOperation::DiscoverAgent, context))
            .await
            .unwrap();
        let value = seen.lock().unwrap().clone();
        value
    }

    #[tokio::test]
    async fn test_layer_injects_credentials() {
        let value = seen_auth(AuthLayer::bearer("tok"), RequestContext::default()).await;
        assert_eq!(value.as_deref(), Some("Bearer tok"));
    }

    #[tokio::test]
    async fn test_layer_without_credentials_passes_through() {
        let value = seen_auth(AuthLayer::optional(None), RequestContext::default()).await;
        assert!(value.is_none());

        let context = RequestContext::new().with_auth(AuthCredentials::bearer("explicit"));
        let value = seen_auth(AuthLayer::bearer("layer"), context).await;
        assert_eq!(value.as_deref(), Some("Bearer explicit"));
    }
}
