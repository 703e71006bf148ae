// src/query/listing.rs

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::errors::{Result, SupervisorError};
use crate::exec::CommandRunner;
use crate::types::ShellFlavor;

use super::run_query;
use super::templates::list_processes_query;

/// One discovered OS process instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProcessRecord {
    #[serde(rename = "ProcessName")]
    pub name: String,
    #[serde(rename = "Id")]
    pub pid: u32,
}

/// Parse the listing query output into records.
///
/// A single match is printed as a bare object, so output that is not
/// bracket-delimited is wrapped before parsing. Empty output is zero records.
/// Malformed output is an error, never "no processes".
pub fn parse_process_records(output: &str) -> Result<Vec<ProcessRecord>> {
    let trimmed = output.trim();
    let body = if !trimmed.starts_with('[') && !trimmed.ends_with(']') {
        format!("[{trimmed}]")
    } else {
        trimmed.to_string()
    };

    serde_json::from_str(&body).map_err(|e| {
        SupervisorError::QueryFailure(format!("malformed process listing ({e}): {trimmed}"))
    })
}

/// Lists every process matching a display name.
#[derive(Clone)]
pub struct ProcessQuery {
    runner: Arc<dyn CommandRunner>,
    shell: ShellFlavor,
    working_dir: PathBuf,
}

impl ProcessQuery {
    pub fn new(runner: Arc<dyn CommandRunner>, shell: ShellFlavor, working_dir: PathBuf) -> Self {
        Self {
            runner,
            shell,
            working_dir,
        }
    }

    pub async fn list_processes(
        &self,
        process_name: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<ProcessRecord>> {
        let query = list_processes_query(self.shell, process_name);
        let output = run_query(self.runner.as_ref(), &self.working_dir, cancel, query).await?;
        let records = parse_process_records(&output)?;
        debug!(process = process_name, count = records.len(), "listed processes");
        Ok(records)
    }
}
