// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::config::loader::DEFAULT_CONFIG_FILE;

/// Command-line arguments for `livewatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "livewatch",
    version,
    about = "Watch project files and restart the application in place when they change.",
    long_about = None
)]
pub struct CliArgs {
    /// File, directory or file:// URI to watch.
    ///
    /// Overrides `[watch].path`; if neither is set, the current directory.
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    /// Path to the config file (TOML). A missing file means defaults.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,

    /// Watch the directory tree, not just its immediate entries.
    #[arg(long, short)]
    pub recursive: bool,

    /// Base-name glob to leave out of the watch set (repeatable).
    ///
    /// Replaces `[watch].name_filters` when given.
    #[arg(long = "filter", short = 'f', value_name = "GLOB")]
    pub filters: Vec<String>,

    /// Start with watching disabled.
    #[arg(long)]
    pub disabled: bool,

    /// Quiet period before a burst of changes triggers a restart.
    #[arg(long, value_name = "MS")]
    pub debounce_ms: Option<u64>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `LIVEWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the effective config and watch set, then exit.
    #[arg(long)]
    pub dry_run: bool,

    /// Application command to run and restart (after `--`).
    #[arg(last = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_path_filters_and_command() {
        let args = CliArgs::parse_from([
            "livewatch", "src", "-r", "-f", "*.pyc", "--filter", "__pycache__", "--", "python",
            "main.py", "--x",
        ]);

        assert_eq!(args.path.as_deref(), Some("src"));
        assert!(args.recursive);
        assert_eq!(args.filters, vec!["*.pyc", "__pycache__"]);
        assert_eq!(args.command, vec!["python", "main.py", "--x"]);
        assert_eq!(args.config, DEFAULT_CONFIG_FILE);
    }

    #[test]
    fn defaults() {
        let args = CliArgs::parse_from(["livewatch"]);
        assert!(args.path.is_none());
        assert!(!args.recursive);
        assert!(args.command.is_empty());
        assert!(args.debounce_ms.is_none());
    }
}
