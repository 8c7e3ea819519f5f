//! # Structured Logging
//!
//! Initializes the `tracing` subscriber with configurable format (JSON or
//! pretty-printed) and environment-based filtering via `RUST_LOG`.
//!
//! All log output is written to stderr. `encode`, `convert` and `prove`
//! print their results on stdout, and those must stay pipeable.

use anyhow::Context;
use clap::ValueEnum;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output format, chosen with `--log-format` or `PRAMAAN_LOG_FORMAT`.
///
/// Unknown values are rejected by clap at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Colored, multi-field lines for a terminal.
    #[default]
    Pretty,
    /// One JSON object per event, for log shippers.
    Json,
}

/// Install the global stderr subscriber.
///
/// `RUST_LOG` overrides `default_level` when set, e.g.:
///
/// ```text
/// RUST_LOG=pramaan=debug,pramaan_protocol=debug,tower_http=info
/// ```
///
/// Fails if a subscriber is already installed.
pub fn init_logging(default_level: &str, format: LogFormat) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Exactly one of the two layers is present.
    let (pretty, json) = match format {
        LogFormat::Pretty => (
            Some(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_file(true)
                    .with_line_number(true),
            ),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(pretty)
        .with(json)
        .try_init()
        .context("tracing subscriber already installed")?;

    tracing::debug!(?format, "logging initialized");
    Ok(())
}
