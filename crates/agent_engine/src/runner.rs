use agent_core::{AgentRequest, JobId, RawProcessOutcome};

use crate::{EngineEvent, RunProgress, Stage};

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);

    fn stage(&self, job_id: JobId, stage: Stage) {
        self.emit(EngineEvent::Progress(RunProgress { job_id, stage }));
    }
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Discards progress; for callers that only want the final result.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgressSink;

impl ProgressSink for NullProgressSink {
    fn emit(&self, _event: EngineEvent) {}
}

/// Runs the worker once and reports what happened, without interpreting it.
#[async_trait::async_trait]
pub trait WorkerRunner: Send + Sync {
    async fn run(
        &self,
        job_id: JobId,
        request: &AgentRequest,
        sink: &dyn ProgressSink,
    ) -> RawProcessOutcome;
}
