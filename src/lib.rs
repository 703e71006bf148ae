// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod identity;
pub mod logging;
pub mod process;
pub mod proxy;
pub mod query;
pub mod supervisor;
pub mod types;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cli::{CliArgs, Command};
use crate::config::load_from_path;
use crate::identity::{IdentityProvider, StaticIdentity};
use crate::supervisor::{ProcessSupervisor, SupervisorDeps};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - identity and proxy resolution
/// - the supervisor with its production collaborators
/// - Ctrl-C handling (cancels in-flight queries and launches)
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_from_path(&config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;

    let identity: Arc<dyn IdentityProvider> =
        Arc::new(StaticIdentity::from_config_or_env(&cfg.identity));
    let supervisor_config = cfg.supervisor_config(identity.as_ref());
    let deps = SupervisorDeps::system(identity, cfg.proxy.resolve(), cfg.supervisor.shell);
    let mut supervisor = ProcessSupervisor::new(supervisor_config, deps);

    // Ctrl-C → cancel whatever is in flight.
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            cancel.cancel();
        });
    }

    match args.command {
        Command::Start {
            orchestration_dir,
            configuration,
        } => {
            let configuration = match configuration {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("reading configuration {}", path.display()))?,
                None => String::new(),
            };
            supervisor
                .start(&configuration, orchestration_dir.as_deref(), &cancel)
                .await?;
            if let Some(process) = supervisor.process() {
                println!("started pid {}", process.pid());
            }
        }
        Command::Stop => {
            let report = supervisor.stop(&cancel).await?;
            println!("stopped {} process(es)", report.attempted());
        }
        Command::Status => {
            let running = supervisor.is_running().await;
            info!(name = supervisor.name(), running, "status checked");
            println!("{}", if running { "running" } else { "stopped" });
        }
    }

    debug!("command complete");
    Ok(())
}
