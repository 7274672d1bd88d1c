use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const ENV_PROGRAM: &str = "AGENT_WORKER_PROGRAM";
pub const ENV_ARGS: &str = "AGENT_WORKER_ARGS";
pub const ENV_WORKING_DIR: &str = "AGENT_WORKER_DIR";
pub const ENV_TIMEOUT_SECS: &str = "AGENT_TIMEOUT_SECS";

const DEFAULT_PROGRAM: &str = "python3";
const DEFAULT_SCRIPT: &str = "agent/run_agent.py";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not valid shell syntax: {message}")]
    InvalidArgs { var: &'static str, message: String },
    #[error("{var} must be a positive number of seconds, got {value:?}")]
    InvalidTimeout { var: &'static str, value: String },
    #[error("{var} must not be empty")]
    EmptyProgram { var: &'static str },
}

/// How to launch the worker. Read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerSettings {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
    pub timeout: Duration,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_PROGRAM),
            args: vec![DEFAULT_SCRIPT.to_string()],
            working_dir: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl WorkerSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; unset or blank keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut settings = Self::default();

        if let Some(program) = lookup(ENV_PROGRAM) {
            if program.trim().is_empty() {
                return Err(ConfigError::EmptyProgram { var: ENV_PROGRAM });
            }
            settings.program = PathBuf::from(program.trim());
        }

        if let Some(raw) = lookup(ENV_ARGS) {
            settings.args =
                shell_words::split(&raw).map_err(|err| ConfigError::InvalidArgs {
                    var: ENV_ARGS,
                    message: err.to_string(),
                })?;
        }

        settings.working_dir = get(ENV_WORKING_DIR).map(PathBuf::from);

        if let Some(raw) = get(ENV_TIMEOUT_SECS) {
            settings.timeout = parse_timeout(&raw).ok_or(ConfigError::InvalidTimeout {
                var: ENV_TIMEOUT_SECS,
                value: raw,
            })?;
        }

        Ok(settings)
    }
}

fn parse_timeout(raw: &str) -> Option<Duration> {
    let secs: f64 = raw.trim().parse().ok()?;
    Duration::try_from_secs_f64(secs)
        .ok()
        .filter(|timeout| !timeout.is_zero())
}
