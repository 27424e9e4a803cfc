//! Bounded Worker Pool
//!
//! Fans out one Fetch-Validate Unit per collection onto the tokio worker
//! threads and fans the results back in as they complete:
//! - **Bounded concurrency**: a semaphore caps the number of running units
//! - **Completion order**: outcomes are yielded as tasks finish, never in submission order
//! - **Isolation**: a panicking or otherwise aborted unit becomes a failed outcome
//!   without affecting the other units

use std::sync::Arc;

use futures::Stream;
use futures::stream::FuturesUnordered;
use tokio::sync::Semaphore;
use tracing::{debug, error};

use crate::error::{CrawlError, Result};
use crate::fetch;
use crate::http_client::AsyncHttpClient;
use crate::registry::CollectionSpec;
use crate::schema::NormalizedRecord;

/// Default number of collections fetched at once
pub const DEFAULT_MAX_CONCURRENCY: usize = 5;

/// Lifecycle of a single collection task
#[derive(Debug, Clone, PartialEq)]
pub enum TaskState {
    /// Submitted, waiting for a worker slot
    Pending,
    /// Holding a worker slot
    Running,
    /// Finished; the records may be empty
    Completed(Vec<NormalizedRecord>),
    /// Fetch, validation or the task itself failed
    Failed(String),
}

impl TaskState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::Pending => "pending",
            TaskState::Running => "running",
            TaskState::Completed(_) => "completed",
            TaskState::Failed(_) => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskState::Completed(_) | TaskState::Failed(_))
    }
}

/// Terminal state of one collection task
#[derive(Debug, Clone)]
pub struct CollectionOutcome {
    pub spec: CollectionSpec,
    pub state: TaskState,
}

impl CollectionOutcome {
    pub fn name(&self) -> &str {
        &self.spec.name
    }

    /// Records to persist; empty for failed tasks
    pub fn records(&self) -> &[NormalizedRecord] {
        match &self.state {
            TaskState::Completed(records) => records,
            _ => &[],
        }
    }
}

/// Semaphore-bounded dispatcher for Fetch-Validate Units
pub struct Dispatcher {
    client: AsyncHttpClient,
    max_concurrency: usize,
}

impl Dispatcher {
    pub fn new(client: AsyncHttpClient, max_concurrency: usize) -> Self {
        Self {
            client,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Launch one fetch per collection and stream outcomes as they complete
    pub fn dispatch(
        &self,
        specs: Vec<CollectionSpec>,
    ) -> impl Stream<Item = CollectionOutcome> + Unpin + Send + use<> {
        let client = self.client.clone();
        self.dispatch_with(specs, move |spec| {
            let client = client.clone();
            async move { fetch::try_fetch_and_validate(&client, &spec).await }
        })
    }

    /// Launch `unit` once per collection and stream outcomes as they complete
    ///
    /// All tasks are spawned before this returns, so they make progress whether
    /// or not the stream is being polled. The stream does not borrow the
    /// dispatcher. Dropping the stream detaches the tasks.
    pub fn dispatch_with<F, Fut>(
        &self,
        specs: Vec<CollectionSpec>,
        unit: F,
    ) -> impl Stream<Item = CollectionOutcome> + Unpin + Send + use<F, Fut>
    where
        F: Fn(CollectionSpec) -> Fut + Clone + Send + 'static,
        Fut: Future<Output = Result<Vec<NormalizedRecord>>> + Send + 'static,
    {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));

        specs
            .into_iter()
            .map(|spec| {
                let semaphore = Arc::clone(&semaphore);
                let unit = unit.clone();
                let task_spec = spec.clone();
                debug!(collection = %spec.name, state = TaskState::Pending.as_str(), "Task submitted");

                let handle = tokio::spawn(async move {
                    let _permit = semaphore.acquire_owned().await.map_err(|_| {
                        CrawlError::Concurrency {
                            details: "Failed to acquire dispatcher semaphore".to_string(),
                        }
                    })?;
                    debug!(collection = %task_spec.name, state = TaskState::Running.as_str(), "Task started");

                    Ok::<_, CrawlError>(unit(task_spec).await)
                });

                async move {
                    let state = match handle.await {
                        Ok(Ok(Ok(records))) => TaskState::Completed(records),
                        Ok(Ok(Err(e))) => {
                            fetch::log_failure(&spec, &e);
                            TaskState::Failed(e.to_string())
                        }
                        Ok(Err(e)) => Self::unexpected(&spec, e),
                        Err(join_error) => Self::unexpected(
                            &spec,
                            CrawlError::Concurrency {
                                details: format!("Task join error: {}", join_error),
                            },
                        ),
                    };
                    debug!(collection = %spec.name, state = state.as_str(), "Task finished");

                    CollectionOutcome { spec, state }
                }
            })
            .collect::<FuturesUnordered<_>>()
    }

    fn unexpected(spec: &CollectionSpec, e: CrawlError) -> TaskState {
        error!(
            collection = %spec.name,
            stage = %e.stage(),
            "Error processing {}: {}",
            spec.name,
            e
        );
        TaskState::Failed(e.to_string())
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }
}
