//! # collection-crawler Library
//!
//! Concurrently fetches the posts, comments, albums, photos and users
//! collections from a JSON API, validates every record against a fixed schema
//! and appends the validated records to per-collection JSON lines files.

pub mod config;
pub mod crawler;
pub mod dispatcher;
pub mod error;
pub mod fetch;
pub mod http_client;
pub mod logging;
pub mod registry;
pub mod schema;
pub mod sink;

pub use config::{CrawlerConfig, DEFAULT_BASE_URL};
pub use crawler::{CollectionReport, CollectionStatus, Crawler, RunSummary};
pub use dispatcher::{CollectionOutcome, DEFAULT_MAX_CONCURRENCY, Dispatcher, TaskState};
pub use error::{ConfigError, CrawlError, FailureStage, Result, SchemaError};
pub use fetch::{fetch_and_validate, try_fetch_and_validate};
pub use http_client::{AsyncHttpClient, HttpClientConfig};
pub use registry::{CollectionSpec, SchemaRegistry};
pub use schema::{
    Address, Album, CollectionKind, Comment, Company, NormalizedRecord, Photo, Post, Schema, User,
};
pub use sink::{JsonlSink, RecordSink};
