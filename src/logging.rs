//! Logging initialization
//!
//! Diagnostics are emitted through `tracing` and written to standard output.
//! The default level is `info`; the standard `RUST_LOG` filter syntax overrides
//! it (for example `RUST_LOG=collection_crawler=debug` adds the per-write echo
//! of filenames and records).

use anyhow::{Context, Result};
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Build the level filter, preferring `RUST_LOG` when it is set and valid
pub fn build_filter(default_level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_str().to_lowercase()))
}

/// Install the global stdout subscriber
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(default_level: Level) -> Result<()> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false)
        .with_thread_ids(false);

    tracing_subscriber::registry()
        .with(build_filter(default_level))
        .with(fmt_layer)
        .try_init()
        .context("Failed to install logging subscriber")?;

    Ok(())
}
