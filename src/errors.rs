// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SupervisorError {
    #[error("Executable not found: {0}")]
    NotFound(PathBuf),

    #[error("Instance identity unavailable: {0}")]
    IdentityUnavailable(String),

    #[error("Process query failed: {0}")]
    QueryFailure(String),

    #[error("Launch failed with exit code {exit_code}: {reason}")]
    LaunchFailure { exit_code: i32, reason: String },

    #[error("Failed to kill {failed} of {attempted} processes: {first}")]
    KillFailure {
        failed: usize,
        attempted: usize,
        first: String,
    },

    #[error("Process still running after stop: {0}")]
    StillRunning(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, SupervisorError>;
