// src/exec/runner.rs

//! Pluggable command runner abstraction.
//!
//! The supervisor and its queries talk to a `CommandRunner` instead of
//! spawning processes directly. Production code uses
//! [`super::ShellCommandRunner`]; tests provide a fake that returns canned
//! query output and records launches.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::time::Duration;

use anyhow::Result;
use tokio_util::sync::CancellationToken;

pub type RunnerFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// A command run to completion with captured output.
#[derive(Debug, Clone)]
pub struct ExecRequest {
    pub working_dir: PathBuf,
    pub command: String,
    pub args: Vec<String>,
    pub timeout: Duration,
    pub cancel: CancellationToken,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Files receiving the output of a detached process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSinks {
    pub stdout: PathBuf,
    pub stderr: PathBuf,
}

/// A command started without waiting for it to exit.
#[derive(Debug, Clone)]
pub struct DetachedRequest {
    pub working_dir: PathBuf,
    pub command: String,
    pub args: Vec<String>,
    pub sinks: OutputSinks,
    pub cancel: CancellationToken,
}

/// PID of a launched process.
///
/// Informational only: stopping always re-discovers processes by name. The
/// runner keeps no `Child` here, so reaping an exited instance never depends
/// on this handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunningProcessHandle {
    pid: u32,
}

impl RunningProcessHandle {
    pub fn new(pid: u32) -> Self {
        Self { pid }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }
}

#[derive(Debug)]
pub struct LaunchOutcome {
    pub handle: RunningProcessHandle,
    pub exit_code: i32,
}

/// Trait abstracting how external commands are executed.
pub trait CommandRunner: Send + Sync {
    /// Run a command to completion, bounded by `request.timeout` and
    /// `request.cancel`.
    fn execute(&self, request: ExecRequest) -> RunnerFuture<'_, CommandOutput>;

    /// Spawn a command and return as soon as it is running.
    fn start_detached(&self, request: DetachedRequest) -> RunnerFuture<'_, LaunchOutcome>;
}
