// src/process/mod.rs

//! OS process access and the kill loop.
//!
//! - [`access`] defines the `OsProcessAccess` capability (PID lookup and
//!   termination) so tests can substitute it.
//! - [`system`] implements it on top of `sysinfo`.
//! - [`killer`] runs the best-effort kill loop and reports per-record results.

pub mod access;
pub mod killer;
pub mod system;

pub use access::{OsProcessAccess, ProcessHandle};
pub use killer::{KillError, KillOutcome, KillReport, ProcessKiller};
pub use system::SystemProcessAccess;
