//! HTTP transport for built requests.
//!
//! The transport only moves bytes: it sends the URL and Authorization header
//! of an [`ApiRequest`] and hands back the unmodified response body. It
//! never retries; callers that want retries wrap the client.

use std::sync::{Arc, Once, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, ClientBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::{ApiError, Result};
use crate::request::ApiRequest;

/// Shared client for transports built with default settings
static GLOBAL_HTTP_CLIENT: OnceLock<Arc<Client>> = OnceLock::new();

static CRYPTO_PROVIDER: Once = Once::new();

/// Install the ring provider for rustls once per process.
///
/// reqwest is built without a default provider, so this must run before the
/// first client is created.
pub fn ensure_crypto_provider() {
    CRYPTO_PROVIDER.call_once(|| {
        // Err only means another provider is already installed
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

/// Executes a built request and returns the raw response body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: &ApiRequest) -> Result<Bytes>;
}

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout
    pub timeout: Duration,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// Connection pool idle timeout
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 10,
            user_agent: concat!("armory-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpConfig {
    /// Create configuration from environment variables
    ///
    /// Reads `ARMORY_CONNECT_TIMEOUT` and `ARMORY_REQUEST_TIMEOUT` in seconds;
    /// unset or malformed values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let secs = |name: &str| {
            var(name)
                .and_then(|value| value.trim().parse().ok())
                .map(Duration::from_secs)
        };
        let defaults = Self::default();
        Self {
            timeout: secs("ARMORY_REQUEST_TIMEOUT").unwrap_or(defaults.timeout),
            connect_timeout: secs("ARMORY_CONNECT_TIMEOUT").unwrap_or(defaults.connect_timeout),
            ..defaults
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    fn client_builder(&self) -> ClientBuilder {
        ClientBuilder::new()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .pool_idle_timeout(self.pool_idle_timeout)
            .pool_max_idle_per_host(self.pool_max_idle_per_host)
            .gzip(true)
            .user_agent(self.user_agent.clone())
    }
}

/// [`Transport`] backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Arc<Client>,
}

impl HttpTransport {
    /// Transport sharing one process-wide client with default settings
    pub fn new() -> Result<Self> {
        if let Some(client) = GLOBAL_HTTP_CLIENT.get() {
            return Ok(Self {
                client: Arc::clone(client),
            });
        }

        ensure_crypto_provider();
        let client = Arc::new(HttpConfig::default().client_builder().build()?);
        let client = GLOBAL_HTTP_CLIENT.get_or_init(|| client);

        Ok(Self {
            client: Arc::clone(client),
        })
    }

    /// Transport with its own client built from `config`
    pub fn with_config(config: &HttpConfig) -> Result<Self> {
        ensure_crypto_provider();
        let client = config.client_builder().build()?;

        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// Wrap an existing reqwest client
    pub fn with_client(client: Client) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<Bytes> {
        let url = request.url();
        // The query carries the API key, keep it out of the logs
        debug!(
            host = url.host_str().unwrap_or_default(),
            path = url.path(),
            authenticated = request.is_authenticated(),
            "HTTP GET"
        );

        let mut builder = self.client.get(url.clone());
        if let Some(authorization) = request.authorization() {
            builder = builder.header(AUTHORIZATION, authorization);
        }

        // reqwest errors carry the full URL, query and API key included
        let response = builder.send().await.map_err(redact)?;
        let status = response.status();
        trace!("Response status: {}", status);

        if !status.is_success() {
            warn!(path = url.path(), %status, "request rejected");
            return Err(ApiError::HttpStatus(status));
        }

        response.bytes().await.map_err(redact)
    }
}

fn redact(error: reqwest::Error) -> ApiError {
    ApiError::Transport(error.without_url())
}
