use crate::error::CrawlError;
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;
use tokio::time::timeout;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            user_agent: format!("collection-crawler/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Async HTTP client for fetching collections
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Clone)]
pub struct AsyncHttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl AsyncHttpClient {
    /// Create a new async HTTP client with the given configuration
    pub fn new(config: HttpClientConfig) -> Result<Self, CrawlError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .map_err(CrawlError::from)?;

        Ok(Self { client, config })
    }

    /// Fetch a URL and decode its body as a JSON array
    ///
    /// A single attempt is made; there is no retry.
    pub async fn fetch_json_array(&self, url: &str) -> Result<Vec<Value>, CrawlError> {
        let response = self.get_checked(url).await?;
        let bytes = timeout(self.timeout(), response.bytes())
            .await
            .map_err(|_| self.timeout_error(url))?
            .map_err(CrawlError::from)?;

        serde_json::from_slice::<Vec<Value>>(&bytes).map_err(|source| CrawlError::Decode {
            url: url.to_string(),
            source,
        })
    }

    /// Issue a GET and reject non-success statuses
    async fn get_checked(&self, url: &str) -> Result<Response, CrawlError> {
        let response = self.make_request(url).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        Err(CrawlError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
            message: format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            ),
        })
    }

    /// Make a single HTTP request with timeout
    async fn make_request(&self, url: &str) -> Result<Response, CrawlError> {
        let request_future = self.client.get(url).send();

        timeout(self.timeout(), request_future)
            .await
            .map_err(|_| self.timeout_error(url))?
            .map_err(|e| {
                if e.is_timeout() {
                    self.timeout_error(url)
                } else {
                    CrawlError::from(e)
                }
            })
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_seconds)
    }

    fn timeout_error(&self, url: &str) -> CrawlError {
        CrawlError::Timeout {
            url: url.to_string(),
            timeout_seconds: self.config.timeout_seconds,
        }
    }
}
