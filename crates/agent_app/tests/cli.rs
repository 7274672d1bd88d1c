#![cfg(unix)]

use std::path::Path;
use std::process::{Command, Output};

fn run_cli(envs: &[(&str, String)], args: &[&str]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_agent-run"));
    command
        .args(args)
        .env_remove("AGENT_WORKER_PROGRAM")
        .env_remove("AGENT_WORKER_ARGS")
        .env_remove("AGENT_WORKER_DIR")
        .env_remove("AGENT_TIMEOUT_SECS");
    for (key, value) in envs {
        command.env(key, value);
    }
    command.output().unwrap()
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn missing_worker_prints_fallback_and_exits_with_error_code() {
    let output = run_cli(
        &[("AGENT_WORKER_PROGRAM", "/nonexistent/python".to_string())],
        &["--prompt", "Build a login form"],
    );

    assert_eq!(output.status.code(), Some(2));
    let result = stdout_json(&output);
    assert_eq!(result["usedFallback"], true);
    assert_eq!(result["status"]["kind"], "error");
    assert_eq!(
        result["status"]["text"],
        "Fallback pathway used because the Python VLM agent is unavailable."
    );
    let messages = result["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 4);
    assert!(messages[0]["content"]
        .as_str()
        .unwrap()
        .starts_with("I received your request:"));
}

#[test]
fn staged_image_reaches_worker_and_is_removed_afterwards() {
    let temp = tempfile::TempDir::new().unwrap();
    let image = temp.path().join("face.png");
    std::fs::write(&image, b"png bytes").unwrap();

    let script = r#"req=$(cat); p=$(printf '%s' "$req" | sed -n 's/.*"image_path":"\([^"]*\)".*/\1/p'); if [ -f "$p" ]; then printf '{"success":true,"result":{"feedback":"%s"}}' "$p"; else printf '{"success":false,"error":"image missing"}'; fi"#;
    let output = run_cli(
        &[
            ("AGENT_WORKER_PROGRAM", "sh".to_string()),
            ("AGENT_WORKER_ARGS", shell_words::join(["-c", script])),
        ],
        &["--prompt", "Add a monocle", "--image", image.to_str().unwrap()],
    );

    assert_eq!(output.status.code(), Some(0), "{output:?}");
    let result = stdout_json(&output);
    let feedback = result["messages"][0]["content"].as_str().unwrap();
    let staged = feedback.strip_prefix("Latest feedback: ").unwrap();
    assert_ne!(Path::new(staged), image.as_path());
    assert!(!Path::new(staged).exists());
    assert!(image.exists());
}

#[test]
fn blank_prompt_is_rejected() {
    let output = run_cli(&[], &["--prompt", "   "]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn invalid_timeout_is_a_configuration_error() {
    let output = run_cli(
        &[("AGENT_TIMEOUT_SECS", "forever".to_string())],
        &["--prompt", "Build a login form"],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("AGENT_TIMEOUT_SECS"));
}
