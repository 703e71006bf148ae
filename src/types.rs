use std::str::FromStr;
use serde::Deserialize;

/// Shell used to run the process-discovery queries.
///
/// - `PowerShell`: `Get-Process` based templates (Windows hosts).
/// - `Posix`: `ps` + awk based templates run through `sh -c`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShellFlavor {
    PowerShell,
    Posix,
}

impl Default for ShellFlavor {
    fn default() -> Self {
        if cfg!(windows) {
            ShellFlavor::PowerShell
        } else {
            ShellFlavor::Posix
        }
    }
}

impl FromStr for ShellFlavor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "powershell" => Ok(ShellFlavor::PowerShell),
            "posix" | "sh" => Ok(ShellFlavor::Posix),
            other => Err(format!(
                "invalid shell: {other} (expected \"powershell\" or \"posix\")"
            )),
        }
    }
}

/// How a probe result maps onto "is the process running".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbePolicy {
    AssumeRunning,
    AssumeNotRunning,
}

impl ProbePolicy {
    pub fn as_running(self) -> bool {
        matches!(self, ProbePolicy::AssumeRunning)
    }
}

/// Output that is neither affirmative nor negative (several matches printed
/// one per line, partial output) counts as running, so a start never races a
/// live instance.
pub const AMBIGUOUS_PROBE_RESULT: ProbePolicy = ProbePolicy::AssumeRunning;

/// A probe that could not execute counts as not running.
///
/// This is the opposite direction from [`AMBIGUOUS_PROBE_RESULT`] and is kept
/// only for compatibility with existing callers; use
/// [`crate::query::StateProbe::probe`] to tell the two cases apart.
pub const PROBE_FAILURE_RESULT: ProbePolicy = ProbePolicy::AssumeNotRunning;
