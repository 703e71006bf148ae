// tests/config_loading.rs

use std::io::Write;
use std::path::PathBuf;

use tempfile::NamedTempFile;

use proc_supervisor::config::{load_from_path, load_from_str};
use proc_supervisor::errors::SupervisorError;
use proc_supervisor::identity::StaticIdentity;
use proc_supervisor::types::ShellFlavor;

#[test]
fn full_config_resolves_paths() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[supervisor]
name = "awsCloudWatch"
plugin_root = "/opt/ssm/plugins"
folder_name = "awsCloudWatch"
executable = "AWS.CloudWatch.exe"
process_name = "AWS.CloudWatch"
data_store = "/var/lib/ssm"
launch_arguments = ["AWS.EC2.Windows.CloudWatch.json"]
shell = "powershell"

[identity]
instance_id = "i-0abc"
region = "eu-west-1"

[proxy]
settings = ["http_proxy=http://proxy:3128", "no_proxy=localhost"]
"#
    )
    .unwrap();

    let cfg = load_from_path(file.path()).unwrap();
    assert_eq!(cfg.supervisor.shell, ShellFlavor::PowerShell);

    let identity = StaticIdentity::from_config_or_env(&cfg.identity);
    let resolved = cfg.supervisor_config(&identity);

    assert_eq!(
        resolved.working_directory,
        PathBuf::from("/opt/ssm/plugins/awsCloudWatch")
    );
    assert_eq!(
        resolved.executable_path,
        PathBuf::from("/opt/ssm/plugins/awsCloudWatch/AWS.CloudWatch.exe")
    );
    assert_eq!(
        resolved.health_check_directory,
        PathBuf::from("/var/lib/ssm/i-0abc/longrunningplugins/healthcheck/awsCloudWatch")
    );
    assert_eq!(resolved.process_display_name, "AWS.CloudWatch");
    assert_eq!(resolved.launch_arguments, vec!["AWS.EC2.Windows.CloudWatch.json"]);

    let proxy = cfg.proxy.resolve();
    assert_eq!(proxy.url, "http://proxy:3128");
    assert_eq!(proxy.no_proxy, "localhost");
}

#[test]
fn empty_config_uses_defaults() {
    let cfg = load_from_str("").unwrap();

    assert_eq!(cfg.supervisor.name, "awsCloudWatch");
    assert_eq!(cfg.supervisor.process_name, "AWS.CloudWatch");
    assert_eq!(cfg.supervisor.executable, "AWS.CloudWatch.exe");
    assert!(cfg.supervisor.launch_arguments.is_empty());
    assert_eq!(cfg.supervisor.shell, ShellFlavor::default());
    assert!(cfg.identity.instance_id.is_none());
    assert!(cfg.proxy.settings.is_empty());
}

#[test]
fn short_instance_id_is_used_in_health_check_path() {
    let cfg = load_from_str(
        r#"
[supervisor]
name = "cw"
data_store = "/data"
"#,
    )
    .unwrap();
    let identity = StaticIdentity::new(Some("mi-prefix/i-0short".to_string()), None);

    let resolved = cfg.supervisor_config(&identity);

    assert_eq!(
        resolved.health_check_directory,
        PathBuf::from("/data/i-0short/longrunningplugins/healthcheck/cw")
    );
}

#[test]
fn unknown_shell_is_rejected() {
    let result = load_from_str(
        r#"
[supervisor]
shell = "fish"
"#,
    );

    match result {
        Err(SupervisorError::TomlError(_)) => {}
        Err(e) => panic!("Expected TomlError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn missing_file_is_io_error() {
    let result = load_from_path("/definitely/not/here/Supervisor.toml");
    assert!(matches!(result, Err(SupervisorError::IoError(_))));
}
