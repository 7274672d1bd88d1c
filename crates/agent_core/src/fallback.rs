//! Soft/hard failure policy and the canned conversation used for soft failures.
use crate::message::{AgentRunResult, DisplayMessage, RunStatus, StatusKind};
use crate::normalize::format_steps;
use crate::outcome::join_blocks;
use crate::request::AgentRequest;

pub const FALLBACK_STATUS_TEXT: &str =
    "Fallback pathway used because the Python VLM agent is unavailable.";
pub const HARD_FAILURE_STATUS_TEXT: &str = "The agent was unable to complete the request.";

/// Reason fragments that mark an infrastructure-level failure. Matched
/// case-insensitively against the whole reason.
const SOFT_FAILURE_MARKERS: &[&str] = &[
    "failed to start",
    "timed out",
    "unable to parse",
    "exited with",
    "process error",
];

const FALLBACK_STEPS: &[&str] = &[
    "Review the prompt and any attached image.",
    "Sketch the layout and the components it needs.",
    "Draft starter code for the main view.",
    "Iterate once the vision agent is back online.",
];

const FALLBACK_CODE: &str = r#"<!-- Placeholder generated locally while the agent is offline -->
<div class="container">
  <h1>Work in progress</h1>
  <p>The generated interface will appear here.</p>
</div>"#;

const FALLBACK_FEEDBACK: &str = "The Python VLM agent could not be reached, so this response was \
generated locally as a fallback. Try again shortly for a full result.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Infrastructure problem; answered with the canned conversation.
    Soft,
    /// Declared by the worker; surfaced verbatim.
    Hard,
}

pub fn classify_failure(reason: &str) -> FailureClass {
    let reason = reason.to_ascii_lowercase();
    if SOFT_FAILURE_MARKERS
        .iter()
        .any(|marker| reason.contains(marker))
    {
        FailureClass::Soft
    } else {
        FailureClass::Hard
    }
}

/// Shape the final result for a failed run.
pub fn failure_result(
    request: &AgentRequest,
    reason: &str,
    diagnostic_log: Option<&str>,
) -> AgentRunResult {
    let detail = match diagnostic_log {
        Some(log) => join_blocks(Some(reason.to_string()), log),
        None => reason.to_string(),
    };

    match classify_failure(reason) {
        FailureClass::Soft => AgentRunResult {
            messages: fallback_messages(request),
            status: RunStatus {
                kind: StatusKind::Error,
                text: FALLBACK_STATUS_TEXT.to_string(),
                detail: Some(detail),
            },
            used_fallback: true,
            final_artifact_path: None,
            final_artifact_web_path: None,
        },
        FailureClass::Hard => AgentRunResult {
            messages: Vec::new(),
            status: RunStatus {
                kind: StatusKind::Error,
                text: HARD_FAILURE_STATUS_TEXT.to_string(),
                detail: Some(detail),
            },
            used_fallback: false,
            final_artifact_path: None,
            final_artifact_web_path: None,
        },
    }
}

fn fallback_messages(request: &AgentRequest) -> Vec<DisplayMessage> {
    let image_note = match request.image_path() {
        Some(_) => " along with the attached image",
        None => "",
    };
    vec![
        DisplayMessage::accent(format!(
            "I received your request: \"{}\"{image_note}. Here's the plan I'll follow while the \
             vision agent is offline: break the task into steps and draft starter code.",
            request.prompt().trim()
        )),
        DisplayMessage::subtle(format_steps(FALLBACK_STEPS)),
        DisplayMessage::accent(FALLBACK_CODE),
        DisplayMessage::subtle(FALLBACK_FEEDBACK),
    ]
}
