// src/logging.rs

//! Logging setup for `livewatch` using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `LIVEWATCH_LOG` environment variable, as `EnvFilter` directives
//!    (e.g. "debug" or "livewatch::watch=trace,info")
//! 3. default to `info`
//!
//! Logs are sent to STDERR so the application's stdout stays clean.

use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

/// Environment variable holding an `EnvFilter` directive string.
pub const LOG_ENV_VAR: &str = "LIVEWATCH_LOG";

/// Initialise the global logging subscriber.
///
/// Fails if a subscriber is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    fmt()
        .with_env_filter(build_filter(cli_level))
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing log subscriber: {e}"))?;

    Ok(())
}

fn build_filter(cli_level: Option<LogLevel>) -> EnvFilter {
    match cli_level {
        Some(lvl) => EnvFilter::new(directive(lvl)),
        None => EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info")),
    }
}

fn directive(lvl: LogLevel) -> &'static str {
    match lvl {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}

/// Report an error nobody else handled, with its full context chain.
///
/// The process keeps running; whether to exit is the caller's decision.
pub fn report_fault(err: &anyhow::Error) {
    tracing::error!(error = %err, "unhandled fault");
    eprintln!("FATAL ERROR: An unexpected error occurred:\n{err}\n\n{err:?}\n");
}

/// Route panics through the same reporting path as other faults.
pub fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!(panic = %info, "panic");
        eprintln!("FATAL ERROR: An unexpected error occurred:\n{info}\n");
        default_hook(info);
    }));
}
