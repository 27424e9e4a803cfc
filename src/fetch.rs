//! Fetch-Validate Unit
//!
//! One HTTP fetch plus schema validation for one collection. Failures never
//! escape this module: every error is logged and turned into an empty result.
//!
//! Validation is all-or-nothing per collection. A single record that fails its
//! schema discards the whole response for that run.

use tracing::{debug, error};

use crate::error::{CrawlError, Result};
use crate::http_client::AsyncHttpClient;
use crate::registry::CollectionSpec;
use crate::schema::NormalizedRecord;

/// Fetch and validate a collection, returning an empty sequence on any failure
pub async fn fetch_and_validate(
    client: &AsyncHttpClient,
    spec: &CollectionSpec,
) -> Vec<NormalizedRecord> {
    match try_fetch_and_validate(client, spec).await {
        Ok(records) => records,
        Err(e) => {
            log_failure(spec, &e);
            Vec::new()
        }
    }
}

/// Emit the diagnostic for a failed fetch or validation
pub fn log_failure(spec: &CollectionSpec, e: &CrawlError) {
    error!(
        collection = %spec.name,
        url = %spec.url,
        stage = %e.stage(),
        "Error fetching or validating data from {}: {}",
        spec.url,
        e
    );
}

/// Fetch and validate a collection, surfacing the first failure
pub async fn try_fetch_and_validate(
    client: &AsyncHttpClient,
    spec: &CollectionSpec,
) -> Result<Vec<NormalizedRecord>> {
    let items = client.fetch_json_array(&spec.url).await?;
    debug!(collection = %spec.name, items = items.len(), "Fetched collection");

    items
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            spec.kind
                .validate(raw)
                .map_err(|source| CrawlError::Validation {
                    url: spec.url.clone(),
                    index,
                    source,
                })
        })
        .collect()
}
