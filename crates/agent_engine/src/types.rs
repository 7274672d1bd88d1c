use agent_core::{AgentRunResult, JobId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Queued,
    Spawning,
    Running,
    Classifying,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunProgress {
    pub job_id: JobId,
    pub stage: Stage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Progress(RunProgress),
    RunCompleted {
        job_id: JobId,
        result: AgentRunResult,
    },
}
