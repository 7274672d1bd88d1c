use std::collections::BTreeMap;

use crate::{AgentRequest, AgentRunResult, DisplayMessage, RunStatus};

pub type JobId = u64;

/// Caller-owned conversation state.
///
/// The onboarding flag lives here rather than in any global so that every
/// session gets exactly one onboarding exchange.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    onboarding_requested: bool,
    next_job_id: JobId,
    pending: BTreeMap<JobId, AgentRequest>,
    transcript: Vec<DisplayMessage>,
    last_status: Option<RunStatus>,
    degraded_runs: usize,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn onboarding_requested(&self) -> bool {
        self.onboarding_requested
    }

    pub fn pending_jobs(&self) -> impl Iterator<Item = JobId> + '_ {
        self.pending.keys().copied()
    }

    pub fn pending_request(&self, job_id: JobId) -> Option<&AgentRequest> {
        self.pending.get(&job_id)
    }

    pub fn transcript(&self) -> &[DisplayMessage] {
        &self.transcript
    }

    pub fn last_status(&self) -> Option<&RunStatus> {
        self.last_status.as_ref()
    }

    /// Runs whose status came back as an error, fallback or not.
    pub fn degraded_runs(&self) -> usize {
        self.degraded_runs
    }

    /// Returns true only the first time it is called.
    pub(crate) fn mark_onboarding_requested(&mut self) -> bool {
        !std::mem::replace(&mut self.onboarding_requested, true)
    }

    pub(crate) fn enqueue(&mut self, request: AgentRequest) -> JobId {
        self.next_job_id += 1;
        let job_id = self.next_job_id;
        self.pending.insert(job_id, request);
        job_id
    }

    /// Records a finished run. Unknown job ids are ignored.
    pub(crate) fn complete(&mut self, job_id: JobId, result: AgentRunResult) -> bool {
        if self.pending.remove(&job_id).is_none() {
            return false;
        }
        if result.is_error() {
            self.degraded_runs += 1;
        }
        self.transcript.extend(result.messages);
        self.last_status = Some(result.status);
        true
    }
}
