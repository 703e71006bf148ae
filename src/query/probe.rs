// src/query/probe.rs

use std::path::PathBuf;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::exec::CommandRunner;
use crate::types::{ShellFlavor, AMBIGUOUS_PROBE_RESULT, PROBE_FAILURE_RESULT};

use super::run_query;
use super::templates::is_running_query;

const AFFIRMATIVE: &str = "True";
const NEGATIVE: &str = "False";

/// What a running-state probe observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Running,
    NotRunning,
    /// Neither token was present; carries the raw output.
    Ambiguous(String),
    /// The query could not be executed.
    Failed(String),
}

impl ProbeOutcome {
    /// Collapse to a boolean using the named probe policies.
    pub fn is_running(&self) -> bool {
        match self {
            ProbeOutcome::Running => true,
            ProbeOutcome::NotRunning => false,
            ProbeOutcome::Ambiguous(_) => AMBIGUOUS_PROBE_RESULT.as_running(),
            ProbeOutcome::Failed(_) => PROBE_FAILURE_RESULT.as_running(),
        }
    }
}

/// Classify the raw text printed by the running query.
pub fn interpret_probe_output(output: &str) -> ProbeOutcome {
    if output.contains(AFFIRMATIVE) {
        ProbeOutcome::Running
    } else if !output.contains(NEGATIVE) {
        ProbeOutcome::Ambiguous(output.trim().to_string())
    } else {
        ProbeOutcome::NotRunning
    }
}

/// Asks the OS whether any process with a display name is active.
#[derive(Clone)]
pub struct StateProbe {
    runner: Arc<dyn CommandRunner>,
    shell: ShellFlavor,
    working_dir: PathBuf,
}

impl StateProbe {
    pub fn new(runner: Arc<dyn CommandRunner>, shell: ShellFlavor, working_dir: PathBuf) -> Self {
        Self {
            runner,
            shell,
            working_dir,
        }
    }

    pub async fn probe(&self, process_name: &str, cancel: &CancellationToken) -> ProbeOutcome {
        let query = is_running_query(self.shell, process_name);
        let output = match run_query(self.runner.as_ref(), &self.working_dir, cancel, query).await {
            Ok(output) => output,
            Err(e) => return ProbeOutcome::Failed(e.to_string()),
        };

        debug!(process = process_name, output = %output.trim(), "running-state probe output");
        interpret_probe_output(&output)
    }

    pub async fn is_running(&self, process_name: &str, cancel: &CancellationToken) -> bool {
        let outcome = self.probe(process_name, cancel).await;
        match &outcome {
            ProbeOutcome::Running => info!(process = process_name, "process is running"),
            ProbeOutcome::NotRunning => info!(process = process_name, "process is not running"),
            ProbeOutcome::Ambiguous(output) => info!(
                process = process_name,
                output = %output,
                "probe output is not a plain yes/no; treating as running"
            ),
            ProbeOutcome::Failed(reason) => warn!(
                process = process_name,
                reason = %reason,
                "probe could not run; reporting not running, which may be wrong"
            ),
        }
        outcome.is_running()
    }
}
