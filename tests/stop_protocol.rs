// tests/stop_protocol.rs

mod common;
use crate::common::builders::{SupervisorBuilder, DISPLAY_NAME};
use crate::common::fake_host::{FakeHost, HostEvent, Scripted};
use crate::common::{init_tracing, with_timeout};

use tokio_util::sync::CancellationToken;

use std::sync::Arc;

use proc_supervisor::errors::SupervisorError;
use proc_supervisor::process::{KillError, ProcessKiller};
use proc_supervisor::query::ProcessRecord;

#[tokio::test]
async fn stop_with_no_matching_processes_succeeds() {
    init_tracing();
    let host = FakeHost::new(DISPLAY_NAME);
    let supervisor = SupervisorBuilder::new(host.clone()).build();

    let report = with_timeout(supervisor.stop(&CancellationToken::new()))
        .await
        .expect("stop with nothing running should succeed");

    assert_eq!(report.attempted(), 0);
    assert!(host.terminated().is_empty());
    assert_eq!(host.events(), vec![HostEvent::List, HostEvent::Probe]);
    assert!(!supervisor.is_running().await);
}

#[tokio::test]
async fn stop_is_idempotent() {
    init_tracing();
    let host = FakeHost::new(DISPLAY_NAME).with_process(42);
    let supervisor = SupervisorBuilder::new(host.clone()).build();
    let cancel = CancellationToken::new();

    supervisor.stop(&cancel).await.expect("first stop");
    let second = supervisor.stop(&cancel).await.expect("second stop");

    assert_eq!(second.attempted(), 0);
    assert_eq!(host.terminated(), vec![42]);
}

#[tokio::test]
async fn stop_kills_every_listed_process() {
    init_tracing();
    let host = FakeHost::new(DISPLAY_NAME);
    host.script_listing(Scripted::Output(
        r#"[{"ProcessName":"AWS.CloudWatch","Id":10},{"ProcessName":"AWS.CloudWatch","Id":20}]"#
            .to_string(),
    ));
    let host = host.with_process(10).with_process(20);
    let supervisor = SupervisorBuilder::new(host.clone()).build();

    let report = supervisor.stop(&CancellationToken::new()).await.unwrap();

    let mut terminated = host.terminated();
    terminated.sort();
    assert_eq!(terminated, vec![10, 20]);
    assert_eq!(report.killed().count(), 2);
    assert!(host.running_pids().is_empty());
}

#[tokio::test]
async fn stop_leaves_unrelated_processes_alone() {
    init_tracing();
    let host = FakeHost::new(DISPLAY_NAME)
        .with_process(7)
        .with_foreign_process(8, "explorer");
    let supervisor = SupervisorBuilder::new(host.clone()).build();

    supervisor.stop(&CancellationToken::new()).await.unwrap();

    assert_eq!(host.terminated(), vec![7]);
}

#[tokio::test]
async fn stop_fails_without_killing_when_listing_fails() {
    init_tracing();
    let host = FakeHost::new(DISPLAY_NAME).with_process(5);
    host.script_listing(Scripted::Fail("powershell not found".to_string()));
    let supervisor = SupervisorBuilder::new(host.clone()).build();

    let err = supervisor.stop(&CancellationToken::new()).await.unwrap_err();

    assert!(matches!(err, SupervisorError::QueryFailure(_)), "got {err:?}");
    assert!(host.terminated().is_empty());
    assert_eq!(host.events(), vec![HostEvent::List]);
}

#[tokio::test]
async fn stop_fails_when_listing_is_malformed() {
    init_tracing();
    let host = FakeHost::new(DISPLAY_NAME).with_process(5);
    host.script_listing(Scripted::Output("{\"ProcessName\": \"AWS.Cloud".to_string()));
    let supervisor = SupervisorBuilder::new(host.clone()).build();

    let err = supervisor.stop(&CancellationToken::new()).await.unwrap_err();

    assert!(matches!(err, SupervisorError::QueryFailure(_)), "got {err:?}");
    assert_eq!(host.running_pids(), vec![5]);
}

#[tokio::test]
async fn stop_attempts_all_records_when_one_fails() {
    init_tracing();
    let host = FakeHost::new(DISPLAY_NAME)
        .with_process(1)
        .with_process(2)
        .with_process(3)
        .unkillable(2);
    let supervisor = SupervisorBuilder::new(host.clone()).build();

    let err = supervisor.stop(&CancellationToken::new()).await.unwrap_err();

    assert_eq!(host.terminated(), vec![1, 2, 3]);
    assert_eq!(host.running_pids(), vec![2]);
    match err {
        SupervisorError::KillFailure {
            failed,
            attempted,
            first,
        } => {
            assert_eq!(failed, 1);
            assert_eq!(attempted, 3);
            assert!(first.contains("pid 2"), "unexpected summary: {first}");
        }
        other => panic!("expected KillFailure, got {other:?}"),
    }
}

#[tokio::test]
async fn stop_reports_failure_when_every_record_fails() {
    init_tracing();
    let host = FakeHost::new(DISPLAY_NAME)
        .with_process(11)
        .with_process(12)
        .unresolvable(11)
        .unkillable(12);
    let supervisor = SupervisorBuilder::new(host.clone()).build();

    let err = supervisor.stop(&CancellationToken::new()).await.unwrap_err();

    match err {
        SupervisorError::KillFailure {
            failed, attempted, ..
        } => {
            assert_eq!(failed, 2);
            assert_eq!(attempted, 2);
        }
        other => panic!("expected KillFailure, got {other:?}"),
    }
    // Unresolvable PIDs are never handed to terminate.
    assert_eq!(host.terminated(), vec![12]);
}

#[tokio::test]
async fn stop_fails_when_process_survives_the_kill_loop() {
    init_tracing();
    let host = FakeHost::new(DISPLAY_NAME).with_process(99).lingering(99);
    let supervisor = SupervisorBuilder::new(host.clone()).build();

    let err = supervisor.stop(&CancellationToken::new()).await.unwrap_err();

    assert!(matches!(err, SupervisorError::StillRunning(_)), "got {err:?}");
    assert_eq!(host.terminated(), vec![99]);
}

#[tokio::test]
async fn stop_fails_when_post_check_is_ambiguous() {
    init_tracing();
    let host = FakeHost::new(DISPLAY_NAME).with_process(3);
    host.script_probe(Scripted::Output(String::new()));
    let supervisor = SupervisorBuilder::new(host.clone()).build();

    let err = supervisor.stop(&CancellationToken::new()).await.unwrap_err();

    assert!(matches!(err, SupervisorError::StillRunning(_)), "got {err:?}");
}

#[test]
fn kill_errors_name_the_failed_step() {
    init_tracing();
    let host = FakeHost::new(DISPLAY_NAME)
        .with_process(31)
        .with_process(32)
        .unresolvable(31)
        .unkillable(32);
    let killer = ProcessKiller::new(Arc::new(host.clone()));
    let records: Vec<ProcessRecord> = [31, 32]
        .into_iter()
        .map(|pid| ProcessRecord {
            name: DISPLAY_NAME.to_string(),
            pid,
        })
        .collect();

    let report = killer.kill_all(&records);

    let errors: Vec<KillError> = report
        .failures()
        .filter_map(|o| o.result.clone().err())
        .collect();
    assert!(matches!(errors[0], KillError::NotFound(_)));
    assert!(matches!(errors[1], KillError::Terminate(_)));
    assert!(errors[0].to_string().starts_with("lookup failed: "));
    assert!(errors[1].to_string().starts_with("terminate failed: "));

    let as_std: &dyn std::error::Error = &errors[1];
    assert!(as_std.to_string().contains("access denied"));
    assert_eq!(
        report.first_error().unwrap(),
        format!("pid 31: {}", errors[0])
    );
}
