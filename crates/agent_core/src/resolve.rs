use crate::fallback::failure_result;
use crate::message::AgentRunResult;
use crate::normalize::success_result;
use crate::outcome::AgentOutcome;
use crate::request::AgentRequest;

/// Final step of an invocation: successes are normalized, failures go through
/// the fallback policy.
pub fn resolve_outcome(request: &AgentRequest, outcome: &AgentOutcome) -> AgentRunResult {
    match outcome {
        AgentOutcome::Success(success) => success_result(success),
        AgentOutcome::Failure {
            reason,
            diagnostic_log,
        } => failure_result(request, reason, diagnostic_log.as_deref()),
    }
}
