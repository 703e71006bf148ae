// src/query/mod.rs

//! Indirect process discovery through shell queries.
//!
//! The host offers no process-by-name API to the supervisor, so both
//! discovery paths shell out and parse text:
//!
//! - [`probe`]: `StateProbe`, the yes/no "is it running" query.
//! - [`listing`]: `ProcessQuery`, the structured `(name, pid)` listing.
//! - [`templates`]: the query scripts for each shell flavor.

pub mod listing;
pub mod probe;
pub mod templates;

use std::path::Path;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::errors::{Result, SupervisorError};
use crate::exec::{CommandRunner, ExecRequest};

pub use listing::{parse_process_records, ProcessQuery, ProcessRecord};
pub use probe::{interpret_probe_output, ProbeOutcome, StateProbe};
pub use templates::QueryCommand;

/// Upper bound for a single query; deciding whether a process runs should
/// never take longer.
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(60);

/// Run a query and return its stdout.
///
/// The queries suppress their own errors, so stderr output and non-zero exit
/// codes are logged but the stdout is still returned. Only a failure to run
/// the query at all is an error.
pub(crate) async fn run_query(
    runner: &dyn CommandRunner,
    working_dir: &Path,
    cancel: &CancellationToken,
    query: QueryCommand,
) -> Result<String> {
    debug!(program = %query.program, args = ?query.args, "running process query");

    let request = ExecRequest {
        working_dir: working_dir.to_path_buf(),
        command: query.program,
        args: query.args,
        timeout: QUERY_TIMEOUT,
        cancel: cancel.clone(),
    };

    let output = runner
        .execute(request)
        .await
        .map_err(|e| SupervisorError::QueryFailure(format!("{e:#}")))?;

    if !output.stderr.trim().is_empty() {
        error!(stderr = %output.stderr.trim(), "process query wrote to stderr");
    }
    debug!(exit_code = output.exit_code, "process query finished");

    Ok(output.stdout)
}
