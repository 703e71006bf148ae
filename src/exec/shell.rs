// src/exec/shell.rs

//! `tokio::process` backed command runner.

use std::fs::File;
use std::process::Stdio;

use anyhow::{anyhow, bail, Context, Result};
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::runner::{
    CommandOutput, CommandRunner, DetachedRequest, ExecRequest, LaunchOutcome,
    RunningProcessHandle, RunnerFuture,
};

/// Real command runner used in production.
#[derive(Debug, Clone, Default)]
pub struct ShellCommandRunner;

impl ShellCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ShellCommandRunner {
    fn execute(&self, request: ExecRequest) -> RunnerFuture<'_, CommandOutput> {
        Box::pin(execute_inner(request))
    }

    fn start_detached(&self, request: DetachedRequest) -> RunnerFuture<'_, LaunchOutcome> {
        Box::pin(start_detached_inner(request))
    }
}

async fn execute_inner(request: ExecRequest) -> Result<CommandOutput> {
    debug!(
        cmd = %request.command,
        args = ?request.args,
        dir = %request.working_dir.display(),
        "executing command"
    );

    let mut cmd = Command::new(&request.command);
    cmd.args(&request.args)
        .current_dir(&request.working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = cmd
        .spawn()
        .with_context(|| format!("spawning '{}'", request.command))?;

    // Dropping the pending future drops the child, which kills it.
    tokio::select! {
        waited = tokio::time::timeout(request.timeout, child.wait_with_output()) => {
            let output = match waited {
                Ok(res) => res.with_context(|| format!("waiting for '{}'", request.command))?,
                Err(_) => bail!(
                    "'{}' timed out after {}s",
                    request.command,
                    request.timeout.as_secs()
                ),
            };

            let exit_code = output.status.code().unwrap_or(-1);
            debug!(cmd = %request.command, exit_code, "command finished");

            Ok(CommandOutput {
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                exit_code,
            })
        }

        _ = request.cancel.cancelled() => {
            bail!("'{}' cancelled", request.command)
        }
    }
}

async fn start_detached_inner(request: DetachedRequest) -> Result<LaunchOutcome> {
    if request.cancel.is_cancelled() {
        bail!("launch of '{}' cancelled before spawn", request.command);
    }

    let stdout = File::create(&request.sinks.stdout)
        .with_context(|| format!("creating {:?}", request.sinks.stdout))?;
    let stderr = File::create(&request.sinks.stderr)
        .with_context(|| format!("creating {:?}", request.sinks.stderr))?;

    let mut cmd = Command::new(&request.command);
    cmd.args(&request.args)
        .current_dir(&request.working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::from(stdout))
        .stderr(Stdio::from(stderr));

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning '{}'", request.command))?;

    let pid = child
        .id()
        .ok_or_else(|| anyhow!("'{}' exited before its pid was read", request.command))?;

    // Only an immediate failed exit is reported; the normal case is still running.
    let exit_code = match child.try_wait()? {
        Some(status) if !status.success() => status.code().unwrap_or(-1),
        _ => 0,
    };

    info!(pid, cmd = %request.command, exit_code, "detached process started");

    // Reap on exit so a killed instance does not linger as a zombie.
    tokio::spawn(async move {
        match child.wait().await {
            Ok(status) => debug!(pid, ?status, "detached process exited"),
            Err(e) => warn!(pid, error = %e, "failed to reap detached process"),
        }
    });

    Ok(LaunchOutcome {
        handle: RunningProcessHandle::new(pid),
        exit_code,
    })
}
