#![cfg(unix)]

mod common;

use std::time::{Duration, Instant};

use agent_core::AgentRequest;
use agent_engine::{NullProgressSink, ProcessSupervisor, Stage, WorkerRunner, WorkerSettings};
use common::{init_logging, sh_worker, TestSink};

fn request() -> AgentRequest {
    AgentRequest::new("Build a login form", None).unwrap()
}

#[tokio::test]
async fn missing_executable_reports_spawn_error() {
    init_logging();
    let supervisor = ProcessSupervisor::new(WorkerSettings {
        program: "/nonexistent/agent-worker".into(),
        args: Vec::new(),
        ..WorkerSettings::default()
    });
    let sink = TestSink::new();

    let outcome = supervisor.run(1, &request(), &sink).await;
    assert!(outcome.spawn_error.is_some());
    assert!(!outcome.exit_observed);
    assert!(!outcome.timed_out);
    assert!(outcome.stdout.is_empty());
    assert_eq!(sink.stages(), vec![Stage::Spawning]);
}

#[tokio::test]
async fn request_is_written_to_stdin_and_closed() {
    init_logging();
    // `cat` only exits once stdin is closed.
    let supervisor = ProcessSupervisor::new(sh_worker("cat", Duration::from_secs(30)));
    let sink = TestSink::new();

    let outcome = supervisor.run(2, &request(), &sink).await;
    assert!(outcome.exit_observed);
    assert_eq!(outcome.exit_code, Some(0));
    let echoed: serde_json::Value = serde_json::from_slice(&outcome.stdout).unwrap();
    assert_eq!(echoed["prompt"], "Build a login form");
    assert!(echoed["image_path"].is_null());
    assert_eq!(sink.stages(), vec![Stage::Spawning, Stage::Running]);
}

#[tokio::test]
async fn large_output_on_both_streams_does_not_deadlock() {
    init_logging();
    let script = "cat >/dev/null; \
        head -c 1048576 /dev/zero | tr '\\000' e >&2; \
        head -c 1048576 /dev/zero | tr '\\000' o";
    let supervisor = ProcessSupervisor::new(sh_worker(script, Duration::from_secs(60)));

    let outcome = supervisor.run(3, &request(), &NullProgressSink).await;
    assert!(!outcome.timed_out);
    assert_eq!(outcome.stderr.len(), 1_048_576);
    assert_eq!(outcome.stdout.len(), 1_048_576);
    assert!(outcome.stderr.iter().all(|b| *b == b'e'));
}

#[tokio::test]
async fn nonzero_exit_code_is_observed() {
    init_logging();
    let supervisor =
        ProcessSupervisor::new(sh_worker("cat >/dev/null; exit 7", Duration::from_secs(30)));

    let outcome = supervisor.run(4, &request(), &NullProgressSink).await;
    assert!(outcome.exit_observed);
    assert_eq!(outcome.exit_code, Some(7));
}

#[tokio::test]
async fn worker_that_ignores_stdin_still_completes() {
    init_logging();
    let supervisor = ProcessSupervisor::new(sh_worker(
        "printf '%s' '{\"success\": true}'",
        Duration::from_secs(30),
    ));

    let outcome = supervisor.run(5, &request(), &NullProgressSink).await;
    assert!(outcome.exit_observed);
    assert_eq!(outcome.stdout, br#"{"success": true}"#);
}

#[tokio::test]
async fn deadline_kills_worker_and_keeps_partial_output() {
    init_logging();
    let temp = tempfile::TempDir::new().unwrap();
    let pid_file = temp.path().join("worker.pid");
    let script = format!(
        "echo $$ > '{}'; echo 'loading weights' >&2; printf 'partial'; exec sleep 30",
        pid_file.display()
    );
    let supervisor = ProcessSupervisor::new(sh_worker(&script, Duration::from_millis(1000)));

    let started = Instant::now();
    let outcome = supervisor.run(6, &request(), &NullProgressSink).await;
    assert!(started.elapsed() < Duration::from_secs(10));
    assert!(outcome.timed_out);
    assert!(!outcome.exit_observed);
    assert_eq!(String::from_utf8_lossy(&outcome.stderr).trim(), "loading weights");
    assert_eq!(outcome.stdout, b"partial");

    let pid = std::fs::read_to_string(&pid_file).unwrap();
    let alive = std::process::Command::new("kill")
        .arg("-0")
        .arg(pid.trim())
        .stderr(std::process::Stdio::null())
        .status()
        .unwrap()
        .success();
    assert!(!alive, "worker {pid} survived the deadline");
}

#[tokio::test]
async fn working_directory_is_applied() {
    init_logging();
    let temp = tempfile::TempDir::new().unwrap();
    let mut settings = sh_worker("cat >/dev/null; pwd", Duration::from_secs(30));
    settings.working_dir = Some(temp.path().to_path_buf());
    let supervisor = ProcessSupervisor::new(settings);

    let outcome = supervisor.run(7, &request(), &NullProgressSink).await;
    let reported = std::path::PathBuf::from(String::from_utf8_lossy(&outcome.stdout).trim());
    assert_eq!(
        reported.canonicalize().unwrap(),
        temp.path().canonicalize().unwrap()
    );
}

#[cfg(target_os = "linux")]
fn process_running(pid: &str) -> bool {
    // Zombies waiting on a reaper count as gone.
    match std::fs::read_to_string(format!("/proc/{pid}/stat")) {
        Ok(stat) => stat
            .rsplit_once(')')
            .map(|(_, rest)| !rest.trim_start().starts_with('Z'))
            .unwrap_or(false),
        Err(_) => false,
    }
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn deadline_kills_processes_started_by_the_worker() {
    init_logging();
    let temp = tempfile::TempDir::new().unwrap();
    let pid_file = temp.path().join("helper.pid");
    let script = format!(
        "sleep 30 >/dev/null 2>&1 & echo $! > '{}'; wait",
        pid_file.display()
    );
    let supervisor = ProcessSupervisor::new(sh_worker(&script, Duration::from_millis(1000)));

    let outcome = supervisor.run(8, &request(), &NullProgressSink).await;
    assert!(outcome.timed_out);

    let pid = std::fs::read_to_string(&pid_file).unwrap();
    let pid = pid.trim();
    let deadline = Instant::now() + Duration::from_secs(5);
    while process_running(pid) && Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(!process_running(pid), "helper {pid} outlived the worker");
}
