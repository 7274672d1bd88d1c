use std::sync::Arc;

use agent_core::{classify, resolve_outcome, AgentOutcome, AgentRequest, AgentRunResult, JobId};
use agent_logging::{agent_info, agent_warn};

use crate::runner::{NullProgressSink, ProgressSink, WorkerRunner};
use crate::{ProcessSupervisor, Stage, WorkerSettings};

/// Runs one request end to end: worker, classification, then fallback or
/// normalization. Every invocation resolves to an [`AgentRunResult`].
#[derive(Clone)]
pub struct Orchestrator {
    runner: Arc<dyn WorkerRunner>,
}

impl Orchestrator {
    pub fn new(settings: WorkerSettings) -> Self {
        Self::with_runner(Arc::new(ProcessSupervisor::new(settings)))
    }

    pub fn with_runner(runner: Arc<dyn WorkerRunner>) -> Self {
        Self { runner }
    }

    pub async fn run_agent(&self, request: &AgentRequest) -> AgentRunResult {
        self.run_job(0, request, &NullProgressSink).await
    }

    pub async fn run_job(
        &self,
        job_id: JobId,
        request: &AgentRequest,
        sink: &dyn ProgressSink,
    ) -> AgentRunResult {
        let raw = self.runner.run(job_id, request, sink).await;

        sink.stage(job_id, Stage::Classifying);
        let outcome = classify(&raw);
        match &outcome {
            AgentOutcome::Success(_) => {
                agent_info!("job {} succeeded in {:?}", job_id, raw.elapsed);
            }
            AgentOutcome::Failure { reason, .. } => {
                agent_warn!("job {} failed in {:?}: {}", job_id, raw.elapsed, reason);
            }
        }

        let result = resolve_outcome(request, &outcome);
        if result.used_fallback {
            agent_warn!("job {} answered with the local fallback", job_id);
        }
        sink.stage(job_id, Stage::Done);
        result
    }
}
