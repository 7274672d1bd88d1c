use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Assistant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Emphasis {
    Accent,
    Subtle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Image,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: Uuid,
    pub name: String,
    pub kind: AttachmentKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// A presentation-ready unit of assistant output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayMessage {
    pub id: Uuid,
    pub role: Role,
    pub emphasis: Emphasis,
    pub content: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_web_path: Option<String>,
}

impl DisplayMessage {
    pub(crate) fn assistant(emphasis: Emphasis, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: Role::Assistant,
            emphasis,
            content: content.into(),
            attachments: Vec::new(),
            artifact_path: None,
            artifact_web_path: None,
        }
    }

    pub(crate) fn accent(content: impl Into<String>) -> Self {
        Self::assistant(Emphasis::Accent, content)
    }

    pub(crate) fn subtle(content: impl Into<String>) -> Self {
        Self::assistant(Emphasis::Subtle, content)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunStatus {
    pub kind: StatusKind,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// The only value returned across the orchestrator boundary.
///
/// `status.kind` alone decides whether the run should be shown as degraded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentRunResult {
    pub messages: Vec<DisplayMessage>,
    pub status: RunStatus,
    pub used_fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_artifact_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_artifact_web_path: Option<String>,
}

impl AgentRunResult {
    pub fn is_error(&self) -> bool {
        self.status.kind == StatusKind::Error
    }
}
