use std::path::PathBuf;

use thiserror::Error;

/// Main application error type covering every stage of a collection crawl
#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status error: {status} for {url} - {message}")]
    HttpStatus {
        url: String,
        status: u16,
        message: String,
    },

    #[error("Request timeout: {url} after {timeout_seconds} seconds")]
    Timeout { url: String, timeout_seconds: u64 },

    #[error("Response body from {url} is not a JSON array: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Record {index} from {url} failed validation: {source}")]
    Validation {
        url: String,
        index: usize,
        #[source]
        source: SchemaError,
    },

    #[error("Failed to append to {path}: {source}")]
    Sink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Record serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Concurrent operation error: {details}")]
    Concurrency { details: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Pipeline stage an error belongs to, used as a structured log field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    /// Connection failure, timeout or non-success status
    Transport,
    /// Response body could not be decoded as a JSON array
    Decode,
    /// A record did not match its schema
    Validation,
    /// Anything outside the fetch/decode/validate path
    Unexpected,
}

impl FailureStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureStage::Transport => "transport",
            FailureStage::Decode => "decode",
            FailureStage::Validation => "validation",
            FailureStage::Unexpected => "unexpected",
        }
    }
}

impl std::fmt::Display for FailureStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CrawlError {
    /// Classify the error by the pipeline stage that produced it
    pub fn stage(&self) -> FailureStage {
        match self {
            CrawlError::Http(_) | CrawlError::HttpStatus { .. } | CrawlError::Timeout { .. } => {
                FailureStage::Transport
            }
            CrawlError::Decode { .. } => FailureStage::Decode,
            CrawlError::Validation { .. } => FailureStage::Validation,
            CrawlError::Sink { .. }
            | CrawlError::Serialize(_)
            | CrawlError::Concurrency { .. }
            | CrawlError::Config(_) => FailureStage::Unexpected,
        }
    }
}

/// Reasons a raw record is rejected by its schema
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("expected a JSON object, found {found}")]
    NotAnObject { found: String },

    #[error("field `{field}`: field required")]
    MissingField { field: String },

    #[error("field `{field}`: expected {expected}, found {found}")]
    WrongType {
        field: String,
        expected: &'static str,
        found: String,
    },
}

impl SchemaError {
    /// Prefix the failing field with the name of its enclosing object
    pub fn nested_under(self, parent: &str) -> Self {
        match self {
            SchemaError::NotAnObject { found } => SchemaError::WrongType {
                field: parent.to_string(),
                expected: "object",
                found,
            },
            SchemaError::MissingField { field } => SchemaError::MissingField {
                field: format!("{}.{}", parent, field),
            },
            SchemaError::WrongType {
                field,
                expected,
                found,
            } => SchemaError::WrongType {
                field: format!("{}.{}", parent, field),
                expected,
                found,
            },
        }
    }
}

/// Configuration-specific error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid configuration value: {field} = {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, CrawlError>;
