//! Turns raw worker output into a typed [`AgentOutcome`].
use serde::Deserialize;

use crate::outcome::{AgentOutcome, AgentSuccess, PreviewImage, RawProcessOutcome, Steps};

pub const PARSE_FAILURE_PREFIX: &str = "unable to parse worker output";
const MISSING_REASON: &str = "agent reported failure without a reason";

/// Envelope the worker writes to stdout as its final act.
#[derive(Debug, Deserialize)]
struct WorkerEnvelope {
    success: bool,
    #[serde(default)]
    result: Option<WorkerResult>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WorkerResult {
    plan: Option<String>,
    steps: Option<Steps>,
    code: Option<String>,
    feedback: Option<String>,
    #[serde(alias = "error_note", alias = "errorNote")]
    error: Option<String>,
    #[serde(alias = "diagnostic_log", alias = "diagnosticLog")]
    logs: Option<String>,
    #[serde(alias = "previewImage")]
    preview_image: Option<PreviewImage>,
    #[serde(alias = "final_artifact_path", alias = "finalImagePath", alias = "finalArtifactPath")]
    final_image_path: Option<String>,
    #[serde(
        alias = "final_artifact_web_path",
        alias = "finalImageWebPath",
        alias = "finalArtifactWebPath"
    )]
    final_image_web_path: Option<String>,
}

impl WorkerEnvelope {
    fn into_outcome(self) -> AgentOutcome {
        if !self.success {
            let reason = self
                .error
                .filter(|reason| !reason.trim().is_empty())
                .unwrap_or_else(|| MISSING_REASON.to_string());
            return AgentOutcome::failure(reason);
        }
        let result = self.result.unwrap_or_default();
        AgentOutcome::Success(AgentSuccess {
            plan: result.plan,
            steps: result.steps,
            code: result.code,
            feedback: result.feedback,
            error_note: result.error,
            diagnostic_log: result.logs.filter(|log| !log.trim().is_empty()),
            preview_image: result.preview_image,
            final_artifact_path: result.final_image_path,
            final_artifact_web_path: result.final_image_web_path,
        })
    }
}

/// Classify one worker run. Stderr is appended to the outcome's diagnostic log
/// on every path.
pub fn classify(raw: &RawProcessOutcome) -> AgentOutcome {
    let mut outcome = classify_primary(raw);
    if let Some(diagnostics) = raw.diagnostics() {
        outcome.append_diagnostics(&diagnostics);
    }
    outcome
}

fn classify_primary(raw: &RawProcessOutcome) -> AgentOutcome {
    if let Some(error) = &raw.spawn_error {
        return AgentOutcome::failure(format!("failed to start agent process: {error}"));
    }
    if raw.timed_out {
        return AgentOutcome::failure(format!(
            "agent process timed out after {:.1}s",
            raw.elapsed.as_secs_f64()
        ));
    }

    match parse_envelope(&raw.stdout) {
        Ok(envelope) => envelope.into_outcome(),
        Err(detail) => match raw.exit_code {
            Some(code) if code != 0 && raw.stdout.iter().all(u8::is_ascii_whitespace) => {
                AgentOutcome::failure(format!("agent process exited with code {code}"))
            }
            _ => AgentOutcome::failure(format!("{PARSE_FAILURE_PREFIX}: {detail}")),
        },
    }
}

fn parse_envelope(stdout: &[u8]) -> Result<WorkerEnvelope, String> {
    let text = String::from_utf8_lossy(stdout);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err("worker produced no output".to_string());
    }

    let whole_err = match serde_json::from_str::<WorkerEnvelope>(trimmed) {
        Ok(envelope) => return Ok(envelope),
        Err(err) => err,
    };

    // Workers sometimes print progress before the final object.
    trimmed
        .lines()
        .rev()
        .map(str::trim)
        .filter(|line| line.starts_with('{'))
        .find_map(|line| serde_json::from_str::<WorkerEnvelope>(line).ok())
        .ok_or_else(|| whole_err.to_string())
}
