//! Logging infrastructure using `tracing` and `tracing-subscriber`.
//!
//! Levels in use across the pipeline:
//!
//! - `error`: run-fatal failures
//! - `warn`: per-variable failures, skipped excluded columns
//! - `info`: stage completions with counts and durations
//! - `debug`: per-variable detail (URLs, file paths, byte counts)

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Configuration for logging behavior.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Maximum level emitted by this crate family.
    pub level_filter: LevelFilter,
    /// Honor a `RUST_LOG` directive when one is set. Explicit `-v`/`-q`
    /// flags turn this off so the command line wins.
    pub use_env_filter: bool,
    /// Output format.
    pub format: LogFormat,
    /// Include the emitting module path in output.
    pub with_target: bool,
    /// Use ANSI colors in output.
    pub with_ansi: bool,
    /// Write logs to this file instead of stderr.
    pub log_file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level_filter: LevelFilter::WARN,
            use_env_filter: true,
            format: LogFormat::default(),
            with_target: false,
            with_ansi: true,
            log_file: None,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format without timestamps.
    #[default]
    Pretty,
    /// Compact single-line format.
    Compact,
    /// JSON lines for machine parsing, timestamps included.
    Json,
}

/// Initialize the global tracing subscriber.
///
/// Called once at startup. Returns an error when the log file cannot be
/// opened; panics if a global subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    if let Some(path) = &config.log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        init_logging_with_writer(config, Arc::new(file));
    } else {
        init_logging_with_writer(config, io::stderr);
    }
    Ok(())
}

/// Initialize logging with a custom writer (useful for testing).
pub fn init_logging_with_writer<W>(config: &LogConfig, writer: W)
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let filter = build_env_filter(config);
    match config.format {
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_target(config.with_target)
                .with_span_events(fmt::format::FmtSpan::CLOSE);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .init();
        }
        LogFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_writer(writer)
                .with_ansi(config.with_ansi)
                .with_target(config.with_target)
                .without_time();
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .init();
        }
        LogFormat::Pretty => {
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(config.with_ansi)
                .with_target(config.with_target)
                .without_time();
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .init();
        }
    }
}

/// Build the filter: `RUST_LOG` wins when allowed, otherwise the
/// configured level applies to the `mdk_*` crates while external crates
/// are capped at warn.
fn build_env_filter(config: &LogConfig) -> EnvFilter {
    if config.use_env_filter
        && let Ok(filter) = EnvFilter::try_from_default_env()
    {
        return filter;
    }
    let level = config.level_filter.to_string().to_lowercase();
    let global = config
        .level_filter
        .min(LevelFilter::WARN)
        .to_string()
        .to_lowercase();
    EnvFilter::new(format!(
        "{global},mdk_cli={level},mdk_fetch={level},mdk_ingest={level},\
         mdk_model={level},mdk_package={level},mdk_validate={level}",
    ))
}
