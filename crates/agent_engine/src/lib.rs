//! Agent engine: worker process supervision and invocation orchestration.
mod collector;
mod engine;
mod orchestrator;
mod runner;
mod settings;
mod staging;
mod supervisor;
mod types;

pub use engine::EngineHandle;
pub use orchestrator::Orchestrator;
pub use runner::{ChannelProgressSink, NullProgressSink, ProgressSink, WorkerRunner};
pub use settings::{
    ConfigError, WorkerSettings, ENV_ARGS, ENV_PROGRAM, ENV_TIMEOUT_SECS, ENV_WORKING_DIR,
};
pub use staging::{StagedImages, StagingError};
pub use supervisor::ProcessSupervisor;
pub use types::{EngineEvent, RunProgress, Stage};
