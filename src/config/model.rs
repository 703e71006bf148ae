// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;
use tracing::debug;

use crate::identity::IdentityProvider;
use crate::proxy::ProxySettings;
use crate::supervisor::SupervisorConfig;
use crate::types::ShellFlavor;

const LONG_RUNNING_PLUGINS_DIR: &str = "longrunningplugins";
const HEALTH_CHECK_DIR: &str = "healthcheck";

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [supervisor]
/// name = "awsCloudWatch"
/// plugin_root = 'C:\Program Files\Amazon\SSM\Plugins'
/// executable = "AWS.CloudWatch.exe"
/// process_name = "AWS.CloudWatch"
/// launch_arguments = ["AWS.EC2.Windows.CloudWatch.json"]
///
/// [identity]
/// instance_id = "i-0123456789abcdef0"
/// region = "us-east-1"
///
/// [proxy]
/// settings = ["http_proxy=http://proxy:3128", "no_proxy=169.254.169.254"]
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub supervisor: SupervisorSection,

    #[serde(default)]
    pub identity: IdentitySection,

    #[serde(default)]
    pub proxy: ProxySection,
}

/// `[supervisor]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SupervisorSection {
    /// Supervisor name; also the orchestration subdirectory name.
    #[serde(default = "default_name")]
    pub name: String,

    /// Directory holding the per-plugin install folders.
    #[serde(default = "default_plugin_root")]
    pub plugin_root: PathBuf,

    /// Install folder under `plugin_root`; the executable runs from here.
    #[serde(default = "default_folder_name")]
    pub folder_name: String,

    /// Executable file name inside the install folder.
    #[serde(default = "default_executable")]
    pub executable: String,

    /// Name the OS reports for running instances.
    #[serde(default = "default_process_name")]
    pub process_name: String,

    /// Root of the per-instance data store (health-check dirs live here).
    #[serde(default = "default_data_store")]
    pub data_store: PathBuf,

    /// Extra arguments placed after the instance id and region.
    #[serde(default)]
    pub launch_arguments: Vec<String>,

    /// Query shell; defaults to PowerShell on Windows, POSIX sh elsewhere.
    #[serde(default)]
    pub shell: ShellFlavor,
}

fn default_name() -> String {
    "awsCloudWatch".to_string()
}

fn default_folder_name() -> String {
    "awsCloudWatch".to_string()
}

fn default_executable() -> String {
    "AWS.CloudWatch.exe".to_string()
}

fn default_process_name() -> String {
    "AWS.CloudWatch".to_string()
}

fn default_plugin_root() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from(r"C:\Program Files\Amazon\SSM\Plugins")
    } else {
        PathBuf::from("/usr/local/lib/proc-supervisor/plugins")
    }
}

fn default_data_store() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from(r"C:\ProgramData\Amazon\SSM\InstanceData")
    } else {
        PathBuf::from("/var/lib/proc-supervisor")
    }
}

impl Default for SupervisorSection {
    fn default() -> Self {
        Self {
            name: default_name(),
            plugin_root: default_plugin_root(),
            folder_name: default_folder_name(),
            executable: default_executable(),
            process_name: default_process_name(),
            data_store: default_data_store(),
            launch_arguments: Vec::new(),
            shell: ShellFlavor::default(),
        }
    }
}

/// `[identity]` section. Missing values fall back to the environment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdentitySection {
    #[serde(default)]
    pub instance_id: Option<String>,

    #[serde(default)]
    pub region: Option<String>,
}

/// `[proxy]` section: `key=value` entries, see [`ProxySettings::parse`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProxySection {
    #[serde(default)]
    pub settings: Vec<String>,
}

impl ProxySection {
    /// Configured entries win; the environment is the fallback.
    pub fn resolve(&self) -> ProxySettings {
        if self.settings.is_empty() {
            debug!("no proxy settings configured; reading environment");
            ProxySettings::from_env()
        } else {
            ProxySettings::parse(&self.settings)
        }
    }
}

impl ConfigFile {
    /// Resolve install and health-check paths into a `SupervisorConfig`.
    ///
    /// An unavailable instance id leaves its path segment empty rather than
    /// failing; the launch itself re-checks identity.
    pub fn supervisor_config(&self, identity: &dyn IdentityProvider) -> SupervisorConfig {
        let s = &self.supervisor;
        let working_directory = s.plugin_root.join(&s.folder_name);
        let executable_path = working_directory.join(&s.executable);

        let short_id = identity.short_instance_id().unwrap_or_default();
        let health_check_directory = s
            .data_store
            .join(short_id)
            .join(LONG_RUNNING_PLUGINS_DIR)
            .join(HEALTH_CHECK_DIR)
            .join(&s.name);

        SupervisorConfig {
            name: s.name.clone(),
            working_directory,
            executable_path,
            health_check_directory,
            process_display_name: s.process_name.clone(),
            launch_arguments: s.launch_arguments.clone(),
        }
    }
}
