use std::time::Duration;

use serde::{Deserialize, Deserializer};

/// Unparsed result of running the worker once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawProcessOutcome {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub exit_observed: bool,
    pub exit_code: Option<i32>,
    pub spawn_error: Option<String>,
    pub timed_out: bool,
    pub elapsed: Duration,
}

impl RawProcessOutcome {
    pub fn spawn_failed(error: impl Into<String>) -> Self {
        Self {
            spawn_error: Some(error.into()),
            ..Self::default()
        }
    }

    /// Stderr as text, or `None` when it carried nothing but whitespace.
    pub fn diagnostics(&self) -> Option<String> {
        let text = String::from_utf8_lossy(&self.stderr);
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

/// Steps arrive either as a list or as one block of text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Steps {
    List(#[serde(deserialize_with = "skip_null_items")] Vec<String>),
    Text(String),
}

fn skip_null_items<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items: Vec<Option<String>> = Vec::deserialize(deserializer)?;
    Ok(items.into_iter().flatten().collect())
}

impl Steps {
    /// Trimmed, non-empty steps in order.
    pub fn items(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            Steps::List(items) => items.iter().flat_map(|item| item.lines()).collect(),
            Steps::Text(text) => text.lines().collect(),
        };
        raw.into_iter()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(ToOwned::to_owned)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PreviewImage {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "encoded_data", alias = "encodedData")]
    pub data: String,
    #[serde(default)]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentSuccess {
    pub plan: Option<String>,
    pub steps: Option<Steps>,
    pub code: Option<String>,
    pub feedback: Option<String>,
    pub error_note: Option<String>,
    pub diagnostic_log: Option<String>,
    pub preview_image: Option<PreviewImage>,
    pub final_artifact_path: Option<String>,
    pub final_artifact_web_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentOutcome {
    Success(AgentSuccess),
    Failure {
        reason: String,
        diagnostic_log: Option<String>,
    },
}

impl AgentOutcome {
    pub fn failure(reason: impl Into<String>) -> Self {
        AgentOutcome::Failure {
            reason: reason.into(),
            diagnostic_log: None,
        }
    }

    pub fn diagnostic_log(&self) -> Option<&str> {
        match self {
            AgentOutcome::Success(success) => success.diagnostic_log.as_deref(),
            AgentOutcome::Failure { diagnostic_log, .. } => diagnostic_log.as_deref(),
        }
    }

    /// Appends diagnostic text after whatever the outcome already carries.
    pub fn append_diagnostics(&mut self, text: &str) {
        let slot = match self {
            AgentOutcome::Success(success) => &mut success.diagnostic_log,
            AgentOutcome::Failure { diagnostic_log, .. } => diagnostic_log,
        };
        *slot = Some(join_blocks(slot.take(), text));
    }
}

/// Joins two text blocks with a blank line, skipping an empty first block.
pub fn join_blocks(existing: Option<String>, addition: &str) -> String {
    match existing {
        Some(existing) if !existing.trim().is_empty() => format!("{existing}\n\n{addition}"),
        _ => addition.to_string(),
    }
}
