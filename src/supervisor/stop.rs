// src/supervisor/stop.rs

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::errors::{Result, SupervisorError};
use crate::process::KillReport;

use super::ProcessSupervisor;

impl ProcessSupervisor {
    /// Terminate every instance matching the display name.
    ///
    /// A failed listing aborts immediately. Otherwise every record is
    /// attempted, then the running state is re-probed. Succeeds only if no
    /// kill failed and nothing is running afterwards; partial kills are not
    /// undone.
    pub async fn stop(&self, cancel: &CancellationToken) -> Result<KillReport> {
        let name = &self.config.process_display_name;

        let records = self
            .query
            .list_processes(name, cancel)
            .await
            .inspect_err(|e| {
                error!(process = %name, error = %e, "cannot stop: unable to list processes");
            })?;
        info!(process = %name, count = records.len(), "processes to terminate");

        let report = self.killer.kill_all(&records);
        let still_running = self.is_running().await;

        if !report.is_clean() {
            error!(process = %name, still_running, "errors while terminating processes");
            return report.into_result();
        }
        if still_running {
            error!(process = %name, "process still running after kill loop");
            return Err(SupervisorError::StillRunning(name.clone()));
        }

        info!(process = %name, killed = report.attempted(), "all processes terminated");
        Ok(report)
    }
}
