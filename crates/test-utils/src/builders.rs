#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use proc_supervisor::fs::mock::MockFileSystem;
use proc_supervisor::identity::StaticIdentity;
use proc_supervisor::proxy::ProxySettings;
use proc_supervisor::supervisor::{ProcessSupervisor, SupervisorConfig, SupervisorDeps};
use proc_supervisor::types::ShellFlavor;

use crate::fake_host::FakeHost;

pub const DISPLAY_NAME: &str = "AWS.CloudWatch";
pub const SUPERVISOR_NAME: &str = "awsCloudWatch";
pub const INSTANCE_ID: &str = "i-0123456789abcdef0";
pub const REGION: &str = "us-east-1";

/// A `SupervisorConfig` rooted at fixed absolute paths (never touched on disk).
pub fn test_config() -> SupervisorConfig {
    let working_directory = PathBuf::from("/opt/plugins").join(SUPERVISOR_NAME);
    SupervisorConfig {
        name: SUPERVISOR_NAME.to_string(),
        executable_path: working_directory.join("AWS.CloudWatch.exe"),
        working_directory,
        health_check_directory: PathBuf::from("/var/lib/supervisor")
            .join(INSTANCE_ID)
            .join("longrunningplugins/healthcheck")
            .join(SUPERVISOR_NAME),
        process_display_name: DISPLAY_NAME.to_string(),
        launch_arguments: vec!["AWS.EC2.Windows.CloudWatch.json".to_string()],
    }
}

/// Builder for a `ProcessSupervisor` wired to a `FakeHost` and a
/// `MockFileSystem`.
pub struct SupervisorBuilder {
    config: SupervisorConfig,
    host: FakeHost,
    fs: MockFileSystem,
    identity: StaticIdentity,
    proxy: ProxySettings,
    install_executable: bool,
}

impl SupervisorBuilder {
    pub fn new(host: FakeHost) -> Self {
        Self {
            config: test_config(),
            host,
            fs: MockFileSystem::new(),
            identity: StaticIdentity::new(Some(INSTANCE_ID.to_string()), Some(REGION.to_string())),
            proxy: ProxySettings::default(),
            install_executable: true,
        }
    }

    pub fn with_fs(mut self, fs: MockFileSystem) -> Self {
        self.fs = fs;
        self
    }

    pub fn with_identity(mut self, instance_id: Option<&str>, region: Option<&str>) -> Self {
        self.identity = StaticIdentity::new(
            instance_id.map(str::to_string),
            region.map(str::to_string),
        );
        self
    }

    pub fn with_proxy(mut self, url: &str, no_proxy: &str) -> Self {
        self.proxy = ProxySettings {
            url: url.to_string(),
            no_proxy: no_proxy.to_string(),
        };
        self
    }

    pub fn with_launch_arguments(mut self, args: &[&str]) -> Self {
        self.config.launch_arguments = args.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn missing_executable(mut self) -> Self {
        self.install_executable = false;
        self
    }

    pub fn build(self) -> ProcessSupervisor {
        if self.install_executable {
            self.fs.add_file(&self.config.executable_path);
        }
        let deps = SupervisorDeps {
            runner: Arc::new(self.host.clone()),
            processes: Arc::new(self.host),
            fs: Arc::new(self.fs),
            identity: Arc::new(self.identity),
            proxy: self.proxy,
            shell: ShellFlavor::Posix,
        };
        ProcessSupervisor::new(self.config, deps)
    }
}
