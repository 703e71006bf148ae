// src/process/system.rs

//! `sysinfo` backed process access.

use std::sync::Mutex;

use anyhow::{anyhow, bail, Result};
use sysinfo::{Pid, ProcessesToUpdate, System};
use tracing::debug;

use super::access::{OsProcessAccess, ProcessHandle};

#[derive(Debug, Default)]
pub struct SystemProcessAccess {
    system: Mutex<System>,
}

impl SystemProcessAccess {
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
        }
    }

    fn with_refreshed<T>(&self, pid: u32, f: impl FnOnce(&System, Pid) -> Result<T>) -> Result<T> {
        let mut system = self
            .system
            .lock()
            .map_err(|_| anyhow!("process table lock poisoned"))?;
        let pid = Pid::from_u32(pid);
        system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        f(&system, pid)
    }
}

impl OsProcessAccess for SystemProcessAccess {
    fn find_by_pid(&self, pid: u32) -> Result<ProcessHandle> {
        self.with_refreshed(pid, |system, sys_pid| {
            let process = system
                .process(sys_pid)
                .ok_or_else(|| anyhow!("no process with pid {pid}"))?;
            Ok(ProcessHandle {
                pid,
                name: process.name().to_string_lossy().into_owned(),
            })
        })
    }

    fn terminate(&self, process: &ProcessHandle) -> Result<()> {
        self.with_refreshed(process.pid, |system, sys_pid| {
            let Some(live) = system.process(sys_pid) else {
                bail!("process {} exited before it could be killed", process.pid);
            };
            if !live.kill() {
                bail!("kill signal was not delivered to process {}", process.pid);
            }
            debug!(pid = process.pid, "kill signal delivered");
            Ok(())
        })
    }
}
