// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::default_config_path;

/// Command-line arguments for `pipeworks`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pipeworks",
    version,
    about = "Run a pipeline of external commands described in a TOML file, without a shell.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the pipeline file (TOML).
    #[arg(long, value_name = "PATH", default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// Feed this process's stdin into the first stage.
    ///
    /// Without it the first stage reads from the null device.
    #[arg(long)]
    pub stdin: bool,

    /// Buffer the final output and only print it if every stage succeeds.
    #[arg(long)]
    pub capture: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PIPEWORKS_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the pipeline, but don't run anything.
    #[arg(long)]
    pub dry_run: bool,
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
    fn defaults() {
        let args = CliArgs::try_parse_from(["pipeworks"]).unwrap();
        assert_eq!(args.config, PathBuf::from("Pipeworks.toml"));
        assert!(!args.stdin);
        assert!(!args.capture);
        assert!(!args.dry_run);
        assert!(args.log_level.is_none());
    }

    #[test]
    fn all_flags() {
        let args = CliArgs::try_parse_from([
            "pipeworks",
            "--config",
            "ci/p.toml",
            "--stdin",
            "--capture",
            "--dry-run",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.config, PathBuf::from("ci/p.toml"));
        assert!(args.stdin && args.capture && args.dry_run);
        assert!(matches!(args.log_level, Some(LogLevel::Debug)));
    }
}
