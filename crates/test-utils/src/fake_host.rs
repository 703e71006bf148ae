use std::collections::{BTreeMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use proc_supervisor::exec::{
    CommandOutput, CommandRunner, DetachedRequest, ExecRequest, LaunchOutcome,
    RunningProcessHandle, RunnerFuture,
};
use proc_supervisor::process::{OsProcessAccess, ProcessHandle};
use proc_supervisor::query::ProcessRecord;

/// One-shot override for the next query of a kind.
#[derive(Debug, Clone)]
pub enum Scripted {
    /// Return this stdout instead of deriving it from the process table.
    Output(String),
    /// Fail to execute the query.
    Fail(String),
}

#[derive(Debug, Clone)]
pub enum LaunchBehaviour {
    Spawn,
    ExitCode(i32),
    Error(String),
}

/// Everything the fake host was asked to do, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Probe,
    List,
    Find(u32),
    Terminate(u32),
    Launch,
}

#[derive(Debug)]
struct HostState {
    display_name: String,
    processes: BTreeMap<u32, String>,
    next_pid: u32,
    probe_script: VecDeque<Scripted>,
    listing_script: VecDeque<Scripted>,
    unresolvable: HashSet<u32>,
    unkillable: HashSet<u32>,
    lingering: HashSet<u32>,
    launch: LaunchBehaviour,
    events: Vec<HostEvent>,
    queries: Vec<ExecRequest>,
    launches: Vec<DetachedRequest>,
}

/// A fake OS: one process table behind both the command runner (queries,
/// launches) and the process access (lookup, kill).
///
/// Query output is derived from the table in the POSIX query format unless a
/// [`Scripted`] override is queued. Clones share state.
#[derive(Debug, Clone)]
pub struct FakeHost {
    state: Arc<Mutex<HostState>>,
}

impl FakeHost {
    pub fn new(display_name: &str) -> Self {
        Self {
            state: Arc::new(Mutex::new(HostState {
                display_name: display_name.to_string(),
                processes: BTreeMap::new(),
                next_pid: 1000,
                probe_script: VecDeque::new(),
                listing_script: VecDeque::new(),
                unresolvable: HashSet::new(),
                unkillable: HashSet::new(),
                lingering: HashSet::new(),
                launch: LaunchBehaviour::Spawn,
                events: Vec::new(),
                queries: Vec::new(),
                launches: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HostState> {
        self.state.lock().unwrap()
    }

    /// Add a running instance of the supervised process.
    pub fn with_process(self, pid: u32) -> Self {
        {
            let mut s = self.lock();
            let name = s.display_name.clone();
            s.processes.insert(pid, name);
        }
        self
    }

    /// Add a running process with some other name.
    pub fn with_foreign_process(self, pid: u32, name: &str) -> Self {
        self.lock().processes.insert(pid, name.to_string());
        self
    }

    /// The PID is listed but cannot be resolved to a live process.
    pub fn unresolvable(self, pid: u32) -> Self {
        self.lock().unresolvable.insert(pid);
        self
    }

    /// Termination of the PID fails and the process keeps running.
    pub fn unkillable(self, pid: u32) -> Self {
        self.lock().unkillable.insert(pid);
        self
    }

    /// Termination of the PID reports success but the process keeps running.
    pub fn lingering(self, pid: u32) -> Self {
        self.lock().lingering.insert(pid);
        self
    }

    pub fn script_probe(&self, scripted: Scripted) {
        self.lock().probe_script.push_back(scripted);
    }

    pub fn script_listing(&self, scripted: Scripted) {
        self.lock().listing_script.push_back(scripted);
    }

    pub fn set_launch(&self, behaviour: LaunchBehaviour) {
        self.lock().launch = behaviour;
    }

    pub fn running_pids(&self) -> Vec<u32> {
        let s = self.lock();
        s.processes
            .iter()
            .filter(|(_, name)| **name == s.display_name)
            .map(|(pid, _)| *pid)
            .collect()
    }

    pub fn events(&self) -> Vec<HostEvent> {
        self.lock().events.clone()
    }

    pub fn terminated(&self) -> Vec<u32> {
        self.lock()
            .events
            .iter()
            .filter_map(|e| match e {
                HostEvent::Terminate(pid) => Some(*pid),
                _ => None,
            })
            .collect()
    }

    pub fn queries(&self) -> Vec<ExecRequest> {
        self.lock().queries.clone()
    }

    pub fn launches(&self) -> Vec<DetachedRequest> {
        self.lock().launches.clone()
    }

    fn answer_query(&self, request: ExecRequest) -> Result<CommandOutput> {
        let mut s = self.lock();
        let script = request.args.last().cloned().unwrap_or_default();
        let is_listing = script.contains("ProcessName");
        s.queries.push(request);

        let scripted = if is_listing {
            s.events.push(HostEvent::List);
            s.listing_script.pop_front()
        } else {
            s.events.push(HostEvent::Probe);
            s.probe_script.pop_front()
        };

        let stdout = match scripted {
            Some(Scripted::Fail(msg)) => return Err(anyhow!(msg)),
            Some(Scripted::Output(out)) => out,
            None => {
                let records: Vec<ProcessRecord> = s
                    .processes
                    .iter()
                    .filter(|(_, name)| **name == s.display_name)
                    .map(|(pid, name)| ProcessRecord {
                        name: name.clone(),
                        pid: *pid,
                    })
                    .collect();
                if is_listing {
                    format!("{}\n", posix_listing(&records))
                } else if records.is_empty() {
                    "False\n".to_string()
                } else {
                    "True\n".to_string()
                }
            }
        };

        Ok(CommandOutput {
            stdout,
            stderr: String::new(),
            exit_code: 0,
        })
    }

    fn launch(&self, request: DetachedRequest) -> Result<LaunchOutcome> {
        let mut s = self.lock();
        s.events.push(HostEvent::Launch);
        s.launches.push(request);

        let pid = s.next_pid;
        s.next_pid += 1;

        match s.launch.clone() {
            LaunchBehaviour::Spawn => {
                let name = s.display_name.clone();
                s.processes.insert(pid, name);
                Ok(LaunchOutcome {
                    handle: RunningProcessHandle::new(pid),
                    exit_code: 0,
                })
            }
            LaunchBehaviour::ExitCode(code) => Ok(LaunchOutcome {
                handle: RunningProcessHandle::new(pid),
                exit_code: code,
            }),
            LaunchBehaviour::Error(msg) => Err(anyhow!(msg)),
        }
    }
}

/// The POSIX listing query always prints an array.
fn posix_listing(records: &[ProcessRecord]) -> String {
    let items: Vec<String> = records
        .iter()
        .map(|r| format!("{{\"ProcessName\":\"{}\",\"Id\":{}}}", r.name, r.pid))
        .collect();
    format!("[{}]", items.join(","))
}

impl CommandRunner for FakeHost {
    fn execute(&self, request: ExecRequest) -> RunnerFuture<'_, CommandOutput> {
        let result = self.answer_query(request);
        Box::pin(async move { result })
    }

    fn start_detached(&self, request: DetachedRequest) -> RunnerFuture<'_, LaunchOutcome> {
        let result = self.launch(request);
        Box::pin(async move { result })
    }
}

impl OsProcessAccess for FakeHost {
    fn find_by_pid(&self, pid: u32) -> Result<ProcessHandle> {
        let mut s = self.lock();
        s.events.push(HostEvent::Find(pid));
        if s.unresolvable.contains(&pid) {
            return Err(anyhow!("no process with pid {pid}"));
        }
        let name = s
            .processes
            .get(&pid)
            .cloned()
            .ok_or_else(|| anyhow!("no process with pid {pid}"))?;
        Ok(ProcessHandle { pid, name })
    }

    fn terminate(&self, process: &ProcessHandle) -> Result<()> {
        let mut s = self.lock();
        s.events.push(HostEvent::Terminate(process.pid));
        if s.unkillable.contains(&process.pid) {
            return Err(anyhow!("access denied killing pid {}", process.pid));
        }
        if !s.lingering.contains(&process.pid) {
            s.processes.remove(&process.pid);
        }
        Ok(())
    }
}
