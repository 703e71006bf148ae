// src/process/access.rs

use std::fmt::Debug;

use anyhow::Result;

/// A live OS process resolved from a PID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessHandle {
    pub pid: u32,
    pub name: String,
}

/// OS process capability the supervisor kills through.
pub trait OsProcessAccess: Send + Sync + Debug {
    /// Resolve `pid` to a live process, failing if none exists.
    fn find_by_pid(&self, pid: u32) -> Result<ProcessHandle>;

    /// Forcefully terminate the process.
    fn terminate(&self, process: &ProcessHandle) -> Result<()>;
}
