// src/process/killer.rs

//! Best-effort kill loop over discovered process records.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info};

use crate::errors::{Result, SupervisorError};
use crate::query::ProcessRecord;

use super::access::OsProcessAccess;

/// Why a single record could not be killed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KillError {
    /// The PID did not resolve to a live process.
    #[error("lookup failed: {0}")]
    NotFound(String),
    /// The process was found but the termination request failed.
    #[error("terminate failed: {0}")]
    Terminate(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KillOutcome {
    pub record: ProcessRecord,
    pub result: std::result::Result<(), KillError>,
}

/// Per-record results of one kill loop, in the order attempted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KillReport {
    pub outcomes: Vec<KillOutcome>,
}

impl KillReport {
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn killed(&self) -> impl Iterator<Item = &ProcessRecord> {
        self.outcomes
            .iter()
            .filter(|o| o.result.is_ok())
            .map(|o| &o.record)
    }

    pub fn failures(&self) -> impl Iterator<Item = &KillOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    pub fn is_clean(&self) -> bool {
        self.failures().next().is_none()
    }

    /// The first failure, formatted with its PID.
    pub fn first_error(&self) -> Option<String> {
        self.failures().next().and_then(|o| match &o.result {
            Err(e) => Some(format!("pid {}: {e}", o.record.pid)),
            Ok(()) => None,
        })
    }

    /// `Ok` when every record was killed, otherwise a `KillFailure` summary.
    pub fn into_result(self) -> Result<KillReport> {
        match self.first_error() {
            None => Ok(self),
            Some(first) => Err(SupervisorError::KillFailure {
                failed: self.failures().count(),
                attempted: self.attempted(),
                first,
            }),
        }
    }
}

/// Resolves PIDs to live processes and terminates them.
#[derive(Debug, Clone)]
pub struct ProcessKiller {
    access: Arc<dyn OsProcessAccess>,
}

impl ProcessKiller {
    pub fn new(access: Arc<dyn OsProcessAccess>) -> Self {
        Self { access }
    }

    /// Kill a single PID.
    pub fn kill(&self, pid: u32) -> std::result::Result<(), KillError> {
        let process = self
            .access
            .find_by_pid(pid)
            .map_err(|e| KillError::NotFound(format!("{e:#}")))?;
        self.access
            .terminate(&process)
            .map_err(|e| KillError::Terminate(format!("{e:#}")))
    }

    /// Attempt every record; a failure never stops the loop.
    pub fn kill_all(&self, records: &[ProcessRecord]) -> KillReport {
        let mut report = KillReport::default();

        for record in records {
            let result = self.kill(record.pid);
            match &result {
                Ok(()) => info!(pid = record.pid, process = %record.name, "killed process"),
                Err(e) => error!(pid = record.pid, process = %record.name, error = %e, "failed to kill process"),
            }
            report.outcomes.push(KillOutcome {
                record: record.clone(),
                result,
            });
        }

        report
    }
}
