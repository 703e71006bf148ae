// src/supervisor/mod.rs

//! Lifecycle supervision of one external long-running executable.
//!
//! `ProcessSupervisor` owns the start/stop protocol:
//!
//! - `start` terminates every running instance (best-effort) and launches a
//!   fresh one without waiting for it to exit ([`start`]).
//! - `stop` lists instances by display name, kills each one without stopping
//!   at the first failure, then re-probes ([`stop`]).
//! - `is_running` is a probe with its own cancellation token.
//!
//! Zero, one or many instances may be running at any point. Killing never
//! relies on the handle from the last launch, since the instance may have
//! been started by an earlier supervisor.
//!
//! Calls on one supervisor must be serialized by the caller.

pub mod args;
pub mod start;
pub mod stop;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::exec::{CommandRunner, RunningProcessHandle, ShellCommandRunner};
use crate::fs::{FileSystem, RealFileSystem};
use crate::identity::IdentityProvider;
use crate::process::{OsProcessAccess, ProcessKiller, SystemProcessAccess};
use crate::proxy::ProxySettings;
use crate::query::{ProcessQuery, StateProbe};
use crate::types::ShellFlavor;

pub use args::build_launch_arguments;

/// Immutable supervisor settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupervisorConfig {
    /// Supervisor name; names the orchestration subdirectory.
    pub name: String,
    /// Directory the executable runs from.
    pub working_directory: PathBuf,
    pub executable_path: PathBuf,
    /// Fixed directory the running-state queries run in.
    pub health_check_directory: PathBuf,
    /// Name the OS reports for running instances.
    pub process_display_name: String,
    /// Arguments placed after the instance id and region.
    pub launch_arguments: Vec<String>,
}

/// External collaborators the supervisor is built on.
#[derive(Clone)]
pub struct SupervisorDeps {
    pub runner: Arc<dyn CommandRunner>,
    pub processes: Arc<dyn OsProcessAccess>,
    pub fs: Arc<dyn FileSystem>,
    pub identity: Arc<dyn IdentityProvider>,
    pub proxy: ProxySettings,
    pub shell: ShellFlavor,
}

impl SupervisorDeps {
    /// Production collaborators: real shell, `sysinfo` and `std::fs`.
    pub fn system(identity: Arc<dyn IdentityProvider>, proxy: ProxySettings, shell: ShellFlavor) -> Self {
        Self {
            runner: Arc::new(ShellCommandRunner::new()),
            processes: Arc::new(SystemProcessAccess::new()),
            fs: Arc::new(RealFileSystem),
            identity,
            proxy,
            shell,
        }
    }
}

pub struct ProcessSupervisor {
    config: SupervisorConfig,
    runner: Arc<dyn CommandRunner>,
    fs: Arc<dyn FileSystem>,
    identity: Arc<dyn IdentityProvider>,
    proxy: ProxySettings,
    probe: StateProbe,
    query: ProcessQuery,
    killer: ProcessKiller,
    process: Option<RunningProcessHandle>,
}

impl fmt::Debug for ProcessSupervisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessSupervisor")
            .field("config", &self.config)
            .field("process", &self.process)
            .finish_non_exhaustive()
    }
}

impl ProcessSupervisor {
    /// Build a supervisor. The health-check directory is created
    /// best-effort; a failure only surfaces later as failing probes.
    pub fn new(config: SupervisorConfig, deps: SupervisorDeps) -> Self {
        if let Err(e) = deps.fs.create_dir_all(&config.health_check_directory) {
            warn!(
                dir = %config.health_check_directory.display(),
                error = %e,
                "could not create health-check directory"
            );
        }

        let query_dir = config.health_check_directory.clone();
        let probe = StateProbe::new(Arc::clone(&deps.runner), deps.shell, query_dir.clone());
        let query = ProcessQuery::new(Arc::clone(&deps.runner), deps.shell, query_dir);

        debug!(name = %config.name, exe = %config.executable_path.display(), "supervisor created");

        Self {
            config,
            runner: deps.runner,
            fs: deps.fs,
            identity: deps.identity,
            proxy: deps.proxy,
            probe,
            query,
            killer: ProcessKiller::new(deps.processes),
            process: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &SupervisorConfig {
        &self.config
    }

    /// Handle from the most recent successful launch. Informational only.
    pub fn process(&self) -> Option<&RunningProcessHandle> {
        self.process.as_ref()
    }

    /// Whether any instance is running.
    ///
    /// Uses a fresh cancellation token, so cancelling an unrelated operation
    /// cannot suppress the health check.
    pub async fn is_running(&self) -> bool {
        self.probe
            .is_running(&self.config.process_display_name, &CancellationToken::new())
            .await
    }
}
