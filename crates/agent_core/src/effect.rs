use crate::{AgentRequest, JobId, RequestError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start the one-time onboarding exchange for this session.
    ShowOnboarding,
    RunAgent { job_id: JobId, request: AgentRequest },
    RejectPrompt { error: RequestError },
}
