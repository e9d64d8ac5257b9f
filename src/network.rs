//! The live-network seam and its reqwest-backed implementation.

use async_trait::async_trait;
use reqwest::Client;

use crate::config::WorkerConfig;
use crate::error::Result;
use crate::snapshot::{RequestKey, ResponseSnapshot};

/// Abstraction over the live network for testability.
///
/// The error contract matters: implementations return `Err` only for
/// transport-level failures (connection refused, DNS, timeout). Any HTTP
/// response, including 4xx/5xx, is `Ok`. The fetch policy falls back to
/// the cache on `Err` alone.
#[async_trait]
pub trait Network: Send + Sync {
    /// Performs the live request for `key`.
    async fn fetch(&self, key: &RequestKey) -> Result<ResponseSnapshot>;
}

/// Default network implementation using `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpNetwork {
    client: Client,
    origin: String,
}

impl HttpNetwork {
    /// Creates a network handle from the worker configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &WorkerConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self::with_client(client, config.origin.clone()))
    }

    /// Creates a network handle from an existing client and origin.
    pub fn with_client(client: Client, origin: impl Into<String>) -> Self {
        let origin = origin.into().trim_end_matches('/').to_string();
        Self { client, origin }
    }

    /// The origin that root-relative paths are resolved against.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.origin, path)
    }
}

#[async_trait]
impl Network for HttpNetwork {
    async fn fetch(&self, key: &RequestKey) -> Result<ResponseSnapshot> {
        let url = self.url_for(key.path());
        let response = self
            .client
            .request(key.method().clone(), url)
            .send()
            .await?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.bytes().await?;

        Ok(ResponseSnapshot::new(status, headers, body))
    }
}
