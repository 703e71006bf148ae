// src/config/mod.rs

//! Configuration loading for proc-supervisor.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Resolve install and health-check paths into a `SupervisorConfig`.

pub mod loader;
pub mod model;

pub use loader::{load_from_path, load_from_str};
pub use model::{ConfigFile, IdentitySection, ProxySection, SupervisorSection};
