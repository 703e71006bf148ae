// src/query/templates.rs

//! The two fixed shell queries, per shell flavor.
//!
//! Both queries suppress query-level errors so the caller only ever sees an
//! empty or negative result:
//!
//! - the *running* query prints `True` or `False` (PowerShell prints the
//!   matching process objects instead when there are several),
//! - the *listing* query prints JSON records `{"ProcessName": .., "Id": ..}`,
//!   a bare object for a single match and an array for several.
//!
//! The POSIX flavor filters `ps` output with awk. The name reaches awk through
//! the environment, never as program text.

use crate::types::ShellFlavor;

/// Every process as `pid stat comm args...`.
const POSIX_PS: &str = "ps -eo pid=,stat=,comm=,args= 2>/dev/null";

/// awk rules selecting live processes named `$PROC_NAME`; the caller appends
/// the action.
///
/// Zombies are skipped. The kernel truncates `comm` (15 bytes on Linux), so a
/// process also matches on the basename of `argv[0]`, or of `argv[1]` when
/// `comm` is the truncated name (interpreted scripts).
const POSIX_MATCH: &str = r#"function base(p) { sub(".*/", "", p); return p }
$2 ~ /^Z/ { next }
{ n = ENVIRON["PROC_NAME"]; c = base($3) }
c == n || base($4) == n || (c == substr(n, 1, 15) && base($5) == n)"#;

/// Prints one JSON record; the name comes pre-escaped in `$PROC_JSON_NAME`.
const POSIX_LIST_ACTION: &str =
    r#"{ printf "%s{\"ProcessName\":%s,\"Id\":%s}", sep, ENVIRON["PROC_JSON_NAME"], $1; sep = "," }"#;

/// Program plus arguments for one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryCommand {
    pub program: String,
    pub args: Vec<String>,
}

pub fn is_running_query(shell: ShellFlavor, process_name: &str) -> QueryCommand {
    match shell {
        ShellFlavor::PowerShell => {
            let name = quote_powershell(process_name);
            powershell(format!(
                "$ProcessActive = Get-Process -Name {name} -ErrorAction SilentlyContinue ; $ProcessActive -ne $null"
            ))
        }
        ShellFlavor::Posix => posix(format!(
            "{POSIX_PS} | PROC_NAME={name} awk '{POSIX_MATCH} {{ found = 1 }}\nEND {{ print (found ? \"True\" : \"False\") }}'",
            name = quote_posix(process_name),
        )),
    }
}

pub fn list_processes_query(shell: ShellFlavor, process_name: &str) -> QueryCommand {
    match shell {
        ShellFlavor::PowerShell => {
            let name = quote_powershell(process_name);
            powershell(format!(
                "Get-Process -Name {name} -ErrorAction SilentlyContinue | Select ProcessName, Id | ConvertTo-Json"
            ))
        }
        ShellFlavor::Posix => {
            let json_name = serde_json::Value::String(process_name.to_string()).to_string();
            posix(format!(
                "{POSIX_PS} | PROC_NAME={name} PROC_JSON_NAME={json} awk 'BEGIN {{ printf \"[\" }}\n{POSIX_MATCH} {POSIX_LIST_ACTION}\nEND {{ print \"]\" }}'",
                name = quote_posix(process_name),
                json = quote_posix(&json_name),
            ))
        }
    }
}

fn powershell(script: String) -> QueryCommand {
    QueryCommand {
        program: "powershell".to_string(),
        args: vec![
            "-NoProfile".to_string(),
            "-NonInteractive".to_string(),
            "-Command".to_string(),
            script,
        ],
    }
}

fn posix(script: String) -> QueryCommand {
    QueryCommand {
        program: "sh".to_string(),
        args: vec!["-c".to_string(), script],
    }
}

/// Single-quote for PowerShell; embedded quotes are doubled.
pub fn quote_powershell(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Single-quote for POSIX sh; embedded quotes close, escape and reopen.
pub fn quote_posix(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}
