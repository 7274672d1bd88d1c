use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use agent_logging::{agent_debug, agent_warn};
use tempfile::{Builder, NamedTempFile, TempDir};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StagingError {
    #[error("could not create staging directory: {0}")]
    StagingDir(String),
    #[error("could not read upload {path:?}: {source}")]
    Source { path: PathBuf, source: io::Error },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Temporary home for uploaded images while one request runs.
///
/// Everything staged here is removed when the value is dropped, so cleanup
/// happens on success, hard failure, fallback, and panics alike.
pub struct StagedImages {
    dir: TempDir,
    staged: Vec<PathBuf>,
}

impl StagedImages {
    pub fn new() -> Result<Self, StagingError> {
        Self::create(Builder::new().prefix("agent-upload-").tempdir())
    }

    pub fn new_in(parent: &Path) -> Result<Self, StagingError> {
        fs::create_dir_all(parent).map_err(|e| StagingError::StagingDir(e.to_string()))?;
        Self::create(Builder::new().prefix("agent-upload-").tempdir_in(parent))
    }

    fn create(dir: io::Result<TempDir>) -> Result<Self, StagingError> {
        let dir = dir.map_err(|e| StagingError::StagingDir(e.to_string()))?;
        agent_debug!("staging uploads in {:?}", dir.path());
        Ok(Self {
            dir,
            staged: Vec::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn staged(&self) -> &[PathBuf] {
        &self.staged
    }

    /// Write uploaded bytes under a sanitized version of `original_name`.
    /// The file is written to a temp name first and then renamed into place.
    pub fn stage_bytes(&mut self, original_name: &str, bytes: &[u8]) -> Result<PathBuf, StagingError> {
        let target = self.dir.path().join(self.unique_name(original_name));
        let mut tmp = NamedTempFile::new_in(self.dir.path())?;
        tmp.write_all(bytes)?;
        tmp.flush()?;
        tmp.persist(&target).map_err(|e| StagingError::Io(e.error))?;
        self.staged.push(target.clone());
        Ok(target)
    }

    pub fn stage_file(&mut self, source: &Path) -> Result<PathBuf, StagingError> {
        let bytes = fs::read(source).map_err(|source_err| StagingError::Source {
            path: source.to_path_buf(),
            source: source_err,
        })?;
        let name = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.stage_bytes(&name, &bytes)
    }

    fn unique_name(&self, original_name: &str) -> String {
        let cleaned = sanitize_file_name(original_name);
        format!("{:02}-{cleaned}", self.staged.len() + 1)
    }
}

impl Drop for StagedImages {
    fn drop(&mut self) {
        for path in &self.staged {
            if let Err(err) = fs::remove_file(path) {
                if err.kind() != io::ErrorKind::NotFound {
                    agent_warn!("could not remove staged upload {:?}: {}", path, err);
                }
            }
        }
        agent_debug!("removed {} staged uploads", self.staged.len());
    }
}

fn sanitize_file_name(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches(&['_', '.'][..]);
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::sanitize_file_name;

    #[test]
    fn path_separators_are_replaced() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "etc_passwd");
        assert_eq!(sanitize_file_name("my photo.png"), "my_photo.png");
    }

    #[test]
    fn empty_names_get_a_default() {
        assert_eq!(sanitize_file_name(""), "upload");
        assert_eq!(sanitize_file_name("///"), "upload");
    }
}
