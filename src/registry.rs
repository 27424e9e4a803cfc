//! Static table of the collections to crawl.

use std::path::{Path, PathBuf};

use crate::schema::CollectionKind;

/// One collection to fetch: its name, source URL and record schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSpec {
    pub name: String,
    pub url: String,
    pub kind: CollectionKind,
}

impl CollectionSpec {
    pub fn new(kind: CollectionKind, base_url: &str) -> Self {
        let name = kind.name().to_string();
        let url = format!("{}/{}", base_url.trim_end_matches('/'), name);
        Self { name, url, kind }
    }

    /// Line-delimited output file for this collection inside `output_dir`
    pub fn output_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(format!("{}.jsonl", self.name))
    }
}

/// Mapping from collection name to source URL and schema
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    base_url: String,
}

impl SchemaRegistry {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// All known collections in table order
    pub fn resolve(&self) -> Vec<CollectionSpec> {
        CollectionKind::ALL
            .iter()
            .map(|kind| CollectionSpec::new(*kind, &self.base_url))
            .collect()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_BASE_URL)
    }
}
