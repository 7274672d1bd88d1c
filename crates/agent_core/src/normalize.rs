use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use uuid::Uuid;

use crate::message::{
    AgentRunResult, Attachment, AttachmentKind, DisplayMessage, RunStatus, StatusKind,
};
use crate::outcome::{AgentSuccess, PreviewImage};

pub const PLAN_PREFIX: &str = "Here's the plan I'll follow:";
pub const STEPS_PREFIX: &str = "Steps:";
pub const FEEDBACK_PREFIX: &str = "Latest feedback: ";
pub const ERROR_NOTE_PREFIX: &str = "Executor reported an issue: ";
pub const EMPTY_RUN_MESSAGE: &str = "The agent completed without generating any updates.";
pub const PREVIEW_MESSAGE: &str = "Here's a preview of the rendered result.";
pub const DEFAULT_PREVIEW_NAME: &str = "preview.png";
pub const SUCCESS_STATUS_TEXT: &str = "Agent run completed.";

/// Build the message list for a successful run.
///
/// Order is fixed: plan, steps, code, preview, feedback, error note. A run that
/// populates none of them still yields one subtle message.
pub fn normalize_messages(success: &AgentSuccess) -> Vec<DisplayMessage> {
    let mut messages = Vec::new();

    if let Some(plan) = non_empty(success.plan.as_deref()) {
        messages.push(DisplayMessage::accent(format!("{PLAN_PREFIX}\n{plan}")));
    }

    if let Some(steps) = &success.steps {
        let items = steps.items();
        if !items.is_empty() {
            messages.push(DisplayMessage::subtle(format_steps(&items)));
        }
    }

    if let Some(code) = non_empty(success.code.as_deref()) {
        let mut message = DisplayMessage::accent(code);
        message.artifact_path = success.final_artifact_path.clone();
        message.artifact_web_path = success.final_artifact_web_path.clone();
        messages.push(message);
    }

    if let Some(preview) = success
        .preview_image
        .as_ref()
        .filter(|preview| !preview.data.trim().is_empty())
    {
        let mut message = DisplayMessage::accent(PREVIEW_MESSAGE);
        message.attachments.push(preview_attachment(preview));
        messages.push(message);
    }

    if let Some(feedback) = non_empty(success.feedback.as_deref()) {
        messages.push(DisplayMessage::subtle(format!("{FEEDBACK_PREFIX}{feedback}")));
    }

    if let Some(note) = non_empty(success.error_note.as_deref()) {
        messages.push(DisplayMessage::subtle(format!("{ERROR_NOTE_PREFIX}{note}")));
    }

    if messages.is_empty() {
        messages.push(DisplayMessage::subtle(EMPTY_RUN_MESSAGE));
    }
    messages
}

pub fn success_result(success: &AgentSuccess) -> AgentRunResult {
    AgentRunResult {
        messages: normalize_messages(success),
        status: RunStatus {
            kind: StatusKind::Success,
            text: SUCCESS_STATUS_TEXT.to_string(),
            detail: success.diagnostic_log.clone(),
        },
        used_fallback: false,
        final_artifact_path: success.final_artifact_path.clone(),
        final_artifact_web_path: success.final_artifact_web_path.clone(),
    }
}

pub(crate) fn format_steps<S: AsRef<str>>(items: &[S]) -> String {
    let mut content = String::from(STEPS_PREFIX);
    for (index, item) in items.iter().enumerate() {
        content.push_str(&format!("\n{}. {}", index + 1, item.as_ref()));
    }
    content
}

fn preview_attachment(preview: &PreviewImage) -> Attachment {
    let name = non_empty(preview.name.as_deref())
        .unwrap_or(DEFAULT_PREVIEW_NAME)
        .to_string();
    let data = preview.data.trim();
    let (reference, payload) = match data.strip_prefix("data:") {
        Some(rest) => (
            data.to_string(),
            rest.split_once(',').map(|(_, payload)| payload).unwrap_or(""),
        ),
        None => (format!("data:{};base64,{data}", mime_for(&name)), data),
    };
    let size = preview.size.or_else(|| {
        BASE64
            .decode(payload)
            .ok()
            .map(|bytes| bytes.len() as u64)
    });

    Attachment {
        id: Uuid::new_v4(),
        name,
        kind: AttachmentKind::Image,
        preview_reference: (!data.is_empty()).then_some(reference),
        size,
    }
}

fn mime_for(name: &str) -> &'static str {
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "image/png",
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
