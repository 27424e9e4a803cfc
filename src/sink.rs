//! Line-delimited JSON sink
//!
//! Appends normalized records to `<name>.jsonl` files, one compact JSON object
//! per line. Files are opened in append mode and never truncated, so repeated
//! runs accumulate records.

use async_trait::async_trait;
use std::path::Path;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::error::{CrawlError, Result};
use crate::schema::NormalizedRecord;

/// Destination for a completed collection's records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Append `records` to `path`, returning the number of lines written
    async fn append(&self, path: &Path, records: &[NormalizedRecord]) -> Result<usize>;
}

/// Appends records as JSON lines to files on disk
#[derive(Debug, Clone, Default)]
pub struct JsonlSink;

impl JsonlSink {
    pub fn new() -> Self {
        Self
    }

    /// Serialize records into a single buffer of newline-terminated lines
    fn encode(records: &[NormalizedRecord]) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        for record in records {
            serde_json::to_writer(&mut buffer, record)?;
            buffer.push(b'\n');
        }
        Ok(buffer)
    }
}

#[async_trait]
impl RecordSink for JsonlSink {
    async fn append(&self, path: &Path, records: &[NormalizedRecord]) -> Result<usize> {
        info!(file = %path.display(), records = ?records, "Appending records");

        let buffer = Self::encode(records)?;
        let sink_error = |source| CrawlError::Sink {
            path: path.to_path_buf(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(sink_error)?;
        file.write_all(&buffer).await.map_err(sink_error)?;
        file.flush().await.map_err(sink_error)?;

        info!(file = %path.display(), count = records.len(), "Wrote records");
        Ok(records.len())
    }
}
