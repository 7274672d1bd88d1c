use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("prompt must not be empty")]
    EmptyPrompt,
}

/// One validated invocation of the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentRequest {
    prompt: String,
    image_path: Option<PathBuf>,
}

impl AgentRequest {
    pub fn new(prompt: impl Into<String>, image_path: Option<PathBuf>) -> Result<Self, RequestError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(RequestError::EmptyPrompt);
        }
        Ok(Self { prompt, image_path })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn image_path(&self) -> Option<&Path> {
        self.image_path.as_deref()
    }

    /// Serialized form written to the worker's stdin.
    pub fn to_worker_payload(&self) -> Result<Vec<u8>, serde_json::Error> {
        #[derive(Serialize)]
        struct Payload<'a> {
            prompt: &'a str,
            image_path: Option<String>,
        }

        serde_json::to_vec(&Payload {
            prompt: &self.prompt,
            image_path: self
                .image_path
                .as_ref()
                .map(|path| path.to_string_lossy().into_owned()),
        })
    }
}
