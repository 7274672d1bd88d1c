use agent_core::{AgentRunResult, Effect, JobId};
use agent_engine::{EngineEvent, EngineHandle, Orchestrator};
use agent_logging::{agent_debug, agent_info, agent_warn};
use anyhow::bail;

pub const ONBOARDING_NOTE: &str = "Welcome! Describe what you want built and optionally attach \
an image. The agent replies with a plan, steps, and code; if it is unavailable you get a local \
fallback and the status says so.";

/// Carries effects from the session out to the engine.
pub struct EffectRunner {
    engine: EngineHandle,
    in_flight: usize,
}

impl EffectRunner {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            engine: EngineHandle::new(orchestrator),
            in_flight: 0,
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn apply(&mut self, effects: Vec<Effect>) -> anyhow::Result<()> {
        for effect in effects {
            match effect {
                Effect::ShowOnboarding => eprintln!("{ONBOARDING_NOTE}"),
                Effect::RunAgent { job_id, request } => {
                    agent_info!(
                        "RunAgent job_id={} prompt_len={} image={}",
                        job_id,
                        request.prompt().len(),
                        request.image_path().is_some()
                    );
                    self.engine.submit(job_id, request);
                    self.in_flight += 1;
                }
                Effect::RejectPrompt { error } => bail!("request rejected: {error}"),
            }
        }
        Ok(())
    }

    /// Blocks until the next run finishes.
    pub fn next_completion(&mut self) -> anyhow::Result<(JobId, AgentRunResult)> {
        loop {
            match self.engine.recv() {
                Some(EngineEvent::Progress(progress)) => {
                    agent_debug!("job {} stage {:?}", progress.job_id, progress.stage);
                }
                Some(EngineEvent::RunCompleted { job_id, result }) => {
                    self.in_flight = self.in_flight.saturating_sub(1);
                    if result.used_fallback {
                        agent_warn!("job {} used the local fallback", job_id);
                    }
                    return Ok((job_id, result));
                }
                None => bail!("engine stopped before the run completed"),
            }
        }
    }
}
