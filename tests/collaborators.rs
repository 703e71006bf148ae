// tests/collaborators.rs

use proc_supervisor::identity::{IdentityProvider, StaticIdentity};
use proc_supervisor::logging::redact_configuration;
use proc_supervisor::proxy::ProxySettings;
use proc_supervisor::query::templates::{
    is_running_query, list_processes_query, quote_posix, quote_powershell,
};
use proc_supervisor::supervisor::build_launch_arguments;
use proc_supervisor::types::ShellFlavor;

#[test]
fn proxy_settings_parse_known_keys() {
    let settings = ProxySettings::parse(&[
        "http_proxy=http://10.0.0.1:8080",
        "garbage",
        "https_proxy=http://ignored",
        "no_proxy=169.254.169.254,localhost",
    ]);

    assert_eq!(settings.url, "http://10.0.0.1:8080");
    assert_eq!(settings.no_proxy, "169.254.169.254,localhost");
}

#[test]
fn proxy_launch_arguments_follow_presence_rules() {
    let both = ProxySettings {
        url: "http://p".to_string(),
        no_proxy: "localhost".to_string(),
    };
    let url_only = ProxySettings {
        url: "http://p".to_string(),
        no_proxy: String::new(),
    };
    let bypass_only = ProxySettings {
        url: String::new(),
        no_proxy: "localhost".to_string(),
    };

    assert_eq!(both.launch_arguments(), vec!["http://p", "localhost"]);
    assert_eq!(url_only.launch_arguments(), vec!["http://p"]);
    assert!(bypass_only.launch_arguments().is_empty());
    assert!(ProxySettings::default().is_empty());
}

#[test]
fn static_identity_requires_values() {
    let identity = StaticIdentity::new(Some("i-1".to_string()), None);
    assert_eq!(identity.instance_id().unwrap(), "i-1");
    assert!(identity.region().is_err());
    assert_eq!(identity.short_instance_id().unwrap(), "i-1");
}

#[test]
fn launch_arguments_order() {
    let identity = StaticIdentity::new(Some("i-1".to_string()), Some("us-west-2".to_string()));
    let proxy = ProxySettings {
        url: "http://p".to_string(),
        no_proxy: String::new(),
    };

    let args = build_launch_arguments(&identity, &["cfg.json".to_string()], &proxy).unwrap();

    assert_eq!(args, vec!["i-1", "us-west-2", "cfg.json", "http://p"]);
}

#[test]
fn redaction_masks_nested_credentials() {
    let config = r#"{"EngineConfiguration":{"Components":[{"Id":"CloudWatch","Parameters":{"AccessKey":"AKIA123","SecretKey":"s3cr3t","Region":"us-east-1"}}]}}"#;

    let redacted = redact_configuration(config);

    assert!(!redacted.contains("AKIA123"));
    assert!(!redacted.contains("s3cr3t"));
    assert!(redacted.contains("us-east-1"));
    assert!(redacted.contains("****"));
}

#[test]
fn redaction_never_echoes_unparseable_input() {
    let redacted = redact_configuration("SecretKey=abc not json");
    assert!(!redacted.contains("abc"));
    assert!(redacted.contains("unparseable"));
    assert_eq!(redact_configuration("   "), "");
}

#[test]
fn quoting_neutralises_embedded_quotes() {
    assert_eq!(quote_posix("a'b"), r"'a'\''b'");
    assert_eq!(quote_powershell("a'b"), "'a''b'");
}

#[test]
fn powershell_templates_use_get_process() {
    let probe = is_running_query(ShellFlavor::PowerShell, "AWS.CloudWatch");
    assert_eq!(probe.program, "powershell");
    let script = probe.args.last().unwrap();
    assert!(script.contains("Get-Process -Name 'AWS.CloudWatch' -ErrorAction SilentlyContinue"));
    assert!(script.contains("$ProcessActive -ne $null"));

    let list = list_processes_query(ShellFlavor::PowerShell, "AWS.CloudWatch");
    let script = list.args.last().unwrap();
    assert!(script.ends_with("| Select ProcessName, Id | ConvertTo-Json"));
}
