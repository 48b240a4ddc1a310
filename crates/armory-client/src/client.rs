//! Community API client

use std::sync::Arc;

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::request::{ApiRequest, QueryParams, RequestBuilder};
use crate::transport::{HttpTransport, Transport};

/// Client bound to one immutable [`ClientConfig`].
///
/// Cloning is cheap; clones share the configuration and the transport.
#[derive(Clone)]
pub struct ApiClient {
    config: Arc<ClientConfig>,
    builder: RequestBuilder,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .field("builder", &self.builder)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Client using the shared HTTP transport
    pub fn new(config: impl Into<Arc<ClientConfig>>) -> Result<Self> {
        Ok(Self::with_transport(config, Arc::new(HttpTransport::new()?)))
    }

    pub fn with_transport(
        config: impl Into<Arc<ClientConfig>>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            config: config.into(),
            builder: RequestBuilder::new(),
            transport,
        }
    }

    /// Replace the request builder, e.g. to pin the signing clock
    pub fn with_builder(mut self, builder: RequestBuilder) -> Self {
        self.builder = builder;
        self
    }

    /// Client for the process-wide current configuration, if one was published
    pub fn current() -> Option<Result<Self>> {
        ClientConfig::current().map(|config| Self::new(config))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build the request for `endpoint` without sending it
    pub fn request(&self, endpoint: &Endpoint) -> Result<ApiRequest> {
        let route = endpoint.route()?;
        self.builder.build(&self.config, &route.path, &route.params)
    }

    /// Fetch `endpoint` and return the unmodified response body
    pub async fn fetch_raw(&self, endpoint: &Endpoint) -> Result<Bytes> {
        let request = self.request(endpoint)?;
        self.transport.execute(&request).await
    }

    /// Fetch `endpoint` and decode the JSON body into `T`
    pub async fn fetch<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<T> {
        let body = self.fetch_raw(endpoint).await?;
        decode(&body)
    }

    /// Fetch an arbitrary resource path below the `wow/` namespace
    pub async fn get_raw(&self, path: &str, params: &QueryParams) -> Result<Bytes> {
        let request = self.builder.build(&self.config, path, params)?;
        self.transport.execute(&request).await
    }

    /// Fetch an arbitrary resource path and decode the JSON body into `T`
    pub async fn get<T: DeserializeOwned>(&self, path: &str, params: &QueryParams) -> Result<T> {
        let body = self.get_raw(path, params).await?;
        decode(&body)
    }
}

/// Decode a JSON response body
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(error = %e, len = body.len(), "response did not match expected shape");
        e.into()
    })
}
