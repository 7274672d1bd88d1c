use std::process::ExitCode;

use agent_core::{update, AgentRunResult, Msg, Session};
use agent_engine::{Orchestrator, StagedImages, WorkerSettings};
use agent_logging::agent_info;
use anyhow::Context;

use crate::cli::Cli;
use crate::effects::EffectRunner;

pub fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let settings = WorkerSettings::from_env().context("invalid worker configuration")?;
    agent_info!(
        "worker {:?} args={:?} timeout={:?}",
        settings.program,
        settings.args,
        settings.timeout
    );

    // Staged uploads are removed when `staged` drops, on every exit path.
    let mut staged = StagedImages::new().context("could not prepare upload staging")?;
    let image_path = match &cli.image {
        Some(path) => Some(staged.stage_file(path).context("could not stage image")?),
        None => None,
    };

    let mut runner = EffectRunner::new(Orchestrator::new(settings));
    let mut session = Session::new();
    let mut inbox = Vec::new();
    if cli.onboarding {
        inbox.push(Msg::OnboardingRequested);
    }
    inbox.push(Msg::PromptSubmitted {
        prompt: cli.prompt.clone(),
        image_path,
    });

    for msg in inbox {
        let (next, effects) = update(session, msg);
        session = next;
        runner.apply(effects)?;
    }

    let mut results = Vec::new();
    while runner.in_flight() > 0 {
        let (job_id, result) = runner.next_completion()?;
        results.push(result.clone());
        session = update(session, Msg::RunCompleted { job_id, result }).0;
    }
    drop(staged);

    for result in &results {
        print_result(result, cli.pretty)?;
    }
    Ok(if session.degraded_runs() > 0 {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    })
}

fn print_result(result: &AgentRunResult, pretty: bool) -> anyhow::Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(result)
    } else {
        serde_json::to_string(result)
    }
    .context("could not serialize result")?;
    println!("{json}");
    Ok(())
}
