use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Caller asked for onboarding; honored once per session.
    OnboardingRequested,
    /// User submitted a prompt with an optional staged image.
    PromptSubmitted {
        prompt: String,
        image_path: Option<PathBuf>,
    },
    /// Engine finished a run.
    RunCompleted {
        job_id: crate::JobId,
        result: crate::AgentRunResult,
    },
    NoOp,
}
