// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`runner`] defines the `CommandRunner` trait and its request/response
//!   types, which the queries and the supervisor depend on.
//! - [`shell`] provides `ShellCommandRunner`, the `tokio::process` backed
//!   implementation used in production. Tests replace it with a fake.

pub mod runner;
pub mod shell;

pub use runner::{
    CommandOutput, CommandRunner, DetachedRequest, ExecRequest, LaunchOutcome, OutputSinks,
    RunningProcessHandle, RunnerFuture,
};
pub use shell::ShellCommandRunner;
