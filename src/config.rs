use std::path::PathBuf;

use crate::error::ConfigError;
use crate::http_client::HttpClientConfig;

/// Base URL of the public collection API
pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Crawler configuration
///
/// The binary always runs with [`CrawlerConfig::default`]; the fields exist so
/// that the pipeline can be pointed at another host or output directory.
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlerConfig {
    /// Scheme and host that collection names are appended to
    pub base_url: String,
    /// Directory holding the `<name>.jsonl` output files
    pub output_dir: PathBuf,
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
    /// Maximum number of collections fetched at once
    pub max_concurrency: usize,
    /// User agent string
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            output_dir: PathBuf::from("."),
            timeout_seconds: 10,
            max_concurrency: 5,
            user_agent: format!("collection-crawler/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl CrawlerConfig {
    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.base_url.trim();
        if base_url.is_empty()
            || !(base_url.starts_with("http://") || base_url.starts_with("https://"))
        {
            return Err(ConfigError::InvalidValue {
                field: "base_url".to_string(),
                value: self.base_url.clone(),
                reason: "must be an http or https URL".to_string(),
            });
        }

        if self.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout_seconds".to_string(),
                value: self.timeout_seconds.to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        if self.max_concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_concurrency".to_string(),
                value: self.max_concurrency.to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// HTTP client settings derived from this configuration
    pub fn http_client_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            timeout_seconds: self.timeout_seconds,
            user_agent: self.user_agent.clone(),
        }
    }
}
