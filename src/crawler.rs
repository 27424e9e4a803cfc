//! Crawl Orchestrator
//!
//! Wires the schema registry, the dispatcher and the sink together. Each
//! completed collection with records is appended to its own `<name>.jsonl`
//! file; empty or failed collections are skipped. A run never fails.

use futures::StreamExt;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{error, info};

use crate::config::CrawlerConfig;
use crate::dispatcher::{CollectionOutcome, Dispatcher, TaskState};
use crate::error::Result;
use crate::http_client::AsyncHttpClient;
use crate::registry::SchemaRegistry;
use crate::sink::{JsonlSink, RecordSink};

/// What happened to one collection during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionStatus {
    /// Records were appended to the output file
    Written(usize),
    /// Fetch succeeded with no records; the sink was not invoked
    Empty,
    /// Fetch, validation, the task or the sink failed
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionReport {
    pub name: String,
    pub status: CollectionStatus,
}

/// Outcome of a full run, in completion order
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub collections: Vec<CollectionReport>,
    pub duration: Duration,
}

impl RunSummary {
    /// Total number of records appended across all collections
    pub fn written_total(&self) -> usize {
        self.collections
            .iter()
            .map(|c| match c.status {
                CollectionStatus::Written(count) => count,
                _ => 0,
            })
            .sum()
    }

    /// Names of collections that failed
    pub fn failed(&self) -> Vec<&str> {
        self.collections
            .iter()
            .filter(|c| matches!(c.status, CollectionStatus::Failed(_)))
            .map(|c| c.name.as_str())
            .collect()
    }

    pub fn status_of(&self, name: &str) -> Option<&CollectionStatus> {
        self.collections
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.status)
    }
}

/// Fetch-validate-persist pipeline over every registered collection
pub struct Crawler<S: RecordSink = JsonlSink> {
    registry: SchemaRegistry,
    dispatcher: Dispatcher,
    sink: S,
    output_dir: PathBuf,
}

impl Crawler<JsonlSink> {
    /// Create a crawler that writes JSON lines files
    pub fn new(config: CrawlerConfig) -> Result<Self> {
        Self::with_sink(config, JsonlSink::new())
    }
}

impl<S: RecordSink> Crawler<S> {
    /// Create a crawler with a custom sink
    pub fn with_sink(config: CrawlerConfig, sink: S) -> Result<Self> {
        config.validate()?;
        let client = AsyncHttpClient::new(config.http_client_config())?;

        Ok(Self {
            registry: SchemaRegistry::new(config.base_url.clone()),
            dispatcher: Dispatcher::new(client, config.max_concurrency),
            sink,
            output_dir: config.output_dir,
        })
    }

    /// Crawl every collection once, appending validated records to disk
    pub async fn run(&self) -> RunSummary {
        let start = Instant::now();
        let specs = self.registry.resolve();
        info!(
            collections = specs.len(),
            max_concurrency = self.dispatcher.max_concurrency(),
            "Starting crawl"
        );

        let mut summary = RunSummary::default();
        let mut outcomes = self.dispatcher.dispatch(specs);
        while let Some(outcome) = outcomes.next().await {
            let report = self.persist(outcome).await;
            summary.collections.push(report);
        }

        summary.duration = start.elapsed();
        info!(
            written = summary.written_total(),
            failed = summary.failed().len(),
            duration_ms = summary.duration.as_millis() as u64,
            "Crawl finished"
        );
        summary
    }

    /// Hand a completed collection to the sink if it has records
    async fn persist(&self, outcome: CollectionOutcome) -> CollectionReport {
        let name = outcome.spec.name.clone();
        let status = match &outcome.state {
            TaskState::Completed(records) if records.is_empty() => CollectionStatus::Empty,
            TaskState::Completed(records) => {
                let path = outcome.spec.output_path(&self.output_dir);
                match self.sink.append(&path, records).await {
                    Ok(count) => CollectionStatus::Written(count),
                    Err(e) => {
                        error!(
                            collection = %name,
                            stage = %e.stage(),
                            "Error processing {}: {}",
                            name,
                            e
                        );
                        CollectionStatus::Failed(e.to_string())
                    }
                }
            }
            TaskState::Failed(reason) => CollectionStatus::Failed(reason.clone()),
            TaskState::Pending | TaskState::Running => {
                CollectionStatus::Failed(format!("task ended in {} state", outcome.state.as_str()))
            }
        };

        CollectionReport { name, status }
    }
}
