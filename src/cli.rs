// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `proc-supervisor`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "proc-supervisor",
    version,
    about = "Start, stop and health-check a long-running supervised executable.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Supervisor.toml` in the current working directory.
    #[arg(long, global = true, value_name = "PATH", default_value = "Supervisor.toml")]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PROC_SUPERVISOR_LOG` or a default level will be used.
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Terminate any running instances and launch a fresh one.
    Start {
        /// Directory receiving the `stdout`/`stderr` capture files.
        ///
        /// A fresh temporary directory is used when omitted.
        #[arg(long, value_name = "DIR")]
        orchestration_dir: Option<PathBuf>,

        /// Configuration document to log (credentials are masked).
        #[arg(long, value_name = "FILE")]
        configuration: Option<PathBuf>,
    },

    /// Terminate every running instance.
    Stop,

    /// Print `running` or `stopped`.
    Status,
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
