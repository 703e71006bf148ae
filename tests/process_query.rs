// tests/process_query.rs

mod common;
use crate::common::builders::DISPLAY_NAME;
use crate::common::fake_host::{FakeHost, Scripted};
use crate::common::init_tracing;

use std::path::PathBuf;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use proc_supervisor::errors::SupervisorError;
use proc_supervisor::query::{parse_process_records, ProcessQuery, ProcessRecord};
use proc_supervisor::types::ShellFlavor;

fn record(pid: u32) -> ProcessRecord {
    ProcessRecord {
        name: DISPLAY_NAME.to_string(),
        pid,
    }
}

fn query(host: &FakeHost) -> ProcessQuery {
    ProcessQuery::new(Arc::new(host.clone()), ShellFlavor::Posix, PathBuf::from("/tmp"))
}

#[test]
fn single_bare_object_is_one_record() {
    let records = parse_process_records(r#"{"ProcessName":"AWS.CloudWatch","Id":4212}"#).unwrap();
    assert_eq!(records, vec![record(4212)]);
}

#[test]
fn array_of_objects_is_every_record() {
    let records = parse_process_records(
        r#"[{"ProcessName":"AWS.CloudWatch","Id":10},{"ProcessName":"AWS.CloudWatch","Id":20}]"#,
    )
    .unwrap();
    assert_eq!(records, vec![record(10), record(20)]);
}

#[test]
fn empty_output_is_no_records() {
    assert!(parse_process_records("").unwrap().is_empty());
    assert!(parse_process_records("  \r\n").unwrap().is_empty());
    assert!(parse_process_records("[]\n").unwrap().is_empty());
}

#[test]
fn pretty_printed_powershell_output_parses() {
    let output = "{\r\n    \"ProcessName\":  \"AWS.CloudWatch\",\r\n    \"Id\":  77\r\n}\r\n";
    assert_eq!(parse_process_records(output).unwrap(), vec![record(77)]);

    let output = "[\r\n    {\r\n        \"ProcessName\":  \"AWS.CloudWatch\",\r\n        \"Id\":  1\r\n    },\r\n    {\r\n        \"ProcessName\":  \"AWS.CloudWatch\",\r\n        \"Id\":  2\r\n    }\r\n]\r\n";
    assert_eq!(parse_process_records(output).unwrap(), vec![record(1), record(2)]);
}

#[test]
fn malformed_output_is_an_error_not_an_empty_list() {
    for output in [
        "{\"ProcessName\":\"AWS.CloudWatch\"",
        "Get-Process : Cannot find a process",
        "[{\"ProcessName\":\"AWS.CloudWatch\",\"Id\":\"abc\"}]",
        "{\"Id\":12}",
    ] {
        match parse_process_records(output) {
            Err(SupervisorError::QueryFailure(msg)) => {
                assert!(msg.contains("malformed"), "unexpected message: {msg}")
            }
            other => panic!("expected QueryFailure for {output:?}, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn list_processes_returns_parsed_records() {
    init_tracing();
    let host = FakeHost::new(DISPLAY_NAME).with_process(31).with_process(32);

    let records = query(&host)
        .list_processes(DISPLAY_NAME, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(records, vec![record(31), record(32)]);
}

#[tokio::test]
async fn list_processes_with_no_matches_is_empty() {
    init_tracing();
    let host = FakeHost::new(DISPLAY_NAME).with_foreign_process(9, "svchost");

    let records = query(&host)
        .list_processes(DISPLAY_NAME, &CancellationToken::new())
        .await
        .unwrap();

    assert!(records.is_empty());
}

#[tokio::test]
async fn list_processes_surfaces_execution_failure() {
    init_tracing();
    let host = FakeHost::new(DISPLAY_NAME);
    host.script_listing(Scripted::Fail("timed out after 60s".to_string()));

    let err = query(&host)
        .list_processes(DISPLAY_NAME, &CancellationToken::new())
        .await
        .unwrap_err();

    match err {
        SupervisorError::QueryFailure(msg) => assert!(msg.contains("timed out")),
        other => panic!("expected QueryFailure, got {other:?}"),
    }
}

#[tokio::test]
async fn list_processes_sends_listing_query_for_the_name() {
    init_tracing();
    let host = FakeHost::new(DISPLAY_NAME);

    query(&host)
        .list_processes(DISPLAY_NAME, &CancellationToken::new())
        .await
        .unwrap();

    let queries = host.queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].command, "sh");
    let script = queries[0].args.last().unwrap();
    assert!(script.contains("PROC_NAME='AWS.CloudWatch'"), "script: {script}");
    assert!(
        script.contains(r#"PROC_JSON_NAME='"AWS.CloudWatch"'"#),
        "script: {script}"
    );
}
