// src/supervisor/start.rs

use std::path::{Path, PathBuf};

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::errors::{Result, SupervisorError};
use crate::exec::{DetachedRequest, OutputSinks};
use crate::logging::redact_configuration;

use super::ProcessSupervisor;
use super::args::build_launch_arguments;

/// Prefix of the temporary orchestration root used when none is supplied.
pub const TEMP_DIR_PREFIX: &str = "Ec2RunCommand";

pub const STDOUT_FILE: &str = "stdout";
pub const STDERR_FILE: &str = "stderr";

impl ProcessSupervisor {
    /// Launch a fresh instance, terminating any running ones first.
    ///
    /// `configuration` is only logged, with credentials masked. When
    /// `orchestration_dir` is `None` (or empty) a temporary root is allocated.
    /// Either way the capture files go to a subdirectory named after this
    /// supervisor, created if absent.
    ///
    /// A failing stop of the old instances is logged and the launch still
    /// proceeds.
    pub async fn start(
        &mut self,
        configuration: &str,
        orchestration_dir: Option<&Path>,
        cancel: &CancellationToken,
    ) -> Result<()> {
        info!(
            name = %self.config.name,
            configuration = %redact_configuration(configuration),
            "configuration to be applied"
        );

        let exe = self.config.executable_path.clone();
        if !self.fs.exists(&exe) {
            error!(exe = %exe.display(), "unable to locate executable");
            return Err(SupervisorError::NotFound(exe));
        }

        let orchestration_dir = self.prepare_orchestration_dir(orchestration_dir)?;
        debug!(
            working_dir = %self.config.working_directory.display(),
            orchestration_dir = %orchestration_dir.display(),
            "resolved directories"
        );

        if self
            .probe
            .is_running(&self.config.process_display_name, cancel)
            .await
        {
            info!(process = %self.config.process_display_name, "already running; terminating before start");
            if let Err(e) = self.stop(cancel).await {
                warn!(error = %e, "stop before start failed; launching anyway");
            }
        }

        let args = build_launch_arguments(
            self.identity.as_ref(),
            &self.config.launch_arguments,
            &self.proxy,
        )?;
        debug!(cmd = %exe.display(), args = ?args, "launch command");

        let sinks = OutputSinks {
            stdout: orchestration_dir.join(STDOUT_FILE),
            stderr: orchestration_dir.join(STDERR_FILE),
        };
        for stale in [&sinks.stdout, &sinks.stderr] {
            if let Err(e) = self.fs.remove_file(stale) {
                debug!(path = %stale.display(), error = %e, "no previous output file removed");
            }
        }

        let request = DetachedRequest {
            working_dir: self.config.working_directory.clone(),
            command: exe.to_string_lossy().into_owned(),
            args,
            sinks,
            cancel: cancel.clone(),
        };

        let outcome = self.runner.start_detached(request).await.map_err(|e| {
            error!(error = %e, "launch failed");
            SupervisorError::LaunchFailure {
                exit_code: -1,
                reason: format!("{e:#}"),
            }
        })?;

        if outcome.exit_code != 0 {
            error!(exit_code = outcome.exit_code, "launched process exited immediately");
            return Err(SupervisorError::LaunchFailure {
                exit_code: outcome.exit_code,
                reason: format!("process {} exited right after launch", outcome.handle.pid()),
            });
        }

        info!(pid = outcome.handle.pid(), name = %self.config.name, "process started");
        self.process = Some(outcome.handle);
        Ok(())
    }

    fn prepare_orchestration_dir(&self, requested: Option<&Path>) -> Result<PathBuf> {
        let root = match requested {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => self.fs.create_temp_dir(TEMP_DIR_PREFIX).map_err(|e| {
                error!(error = %e, "could not allocate a temporary orchestration directory");
                SupervisorError::Other(e)
            })?,
        };

        let dir = root.join(&self.config.name);
        if !self.fs.is_dir(&dir) {
            self.fs.create_dir_all(&dir).map_err(|e| {
                error!(dir = %dir.display(), error = %e, "could not create orchestration directory");
                SupervisorError::Other(e)
            })?;
        }
        Ok(dir)
    }
}
