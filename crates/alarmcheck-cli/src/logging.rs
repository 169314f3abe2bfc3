//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! Logs go to stderr so that reports printed on stdout stay clean.
//! `RUST_LOG` overrides the level chosen from `-v`.

use std::io;

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Configuration for logging behavior.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level filter.
    pub level: Level,
    /// Whether to include target (module path) in log output.
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            with_target: false,
        }
    }
}

impl LogConfig {
    /// Create a `LogConfig` from CLI verbosity count.
    ///
    /// - 0 (no `-v`): warn level
    /// - 1 (`-v`): info level
    /// - 2 (`-vv`): debug level
    /// - 3+ (`-vvv`): trace level
    #[must_use]
    pub fn from_verbosity(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };
        Self {
            level,
            with_target: verbosity >= 3,
        }
    }
}

/// Install the global subscriber. Call once at startup.
pub fn init_logging(config: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_directive(config.level)));

    let layer = fmt::layer()
        .compact()
        .with_writer(io::stderr)
        .with_target(config.with_target)
        .without_time();

    tracing_subscriber::registry().with(filter).with(layer).init();
}

fn level_directive(level: Level) -> String {
    let level = level.as_str().to_ascii_lowercase();
    format!("warn,alarmcheck={level},alarmcheck_cli={level}")
}
