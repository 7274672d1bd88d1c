use std::sync::mpsc;
use std::thread;

use agent_core::{AgentRequest, JobId};
use agent_logging::agent_error;

use crate::runner::{ChannelProgressSink, ProgressSink};
use crate::{EngineEvent, Orchestrator, Stage};

enum EngineCommand {
    Submit { job_id: JobId, request: AgentRequest },
}

/// Background runtime for callers that are not async themselves.
///
/// Submitted runs execute concurrently; each one ends with exactly one
/// [`EngineEvent::RunCompleted`].
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(orchestrator: Orchestrator) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    agent_error!("could not start engine runtime: {}", err);
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                let orchestrator = orchestrator.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(&orchestrator, command, event_tx).await;
                });
            }
            // Let in-flight runs finish before the runtime is dropped.
            runtime.shutdown_timeout(std::time::Duration::from_secs(5));
        });

        Self { cmd_tx, event_rx }
    }

    pub fn submit(&self, job_id: JobId, request: AgentRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Submit { job_id, request });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Blocks until the next event; `None` once the engine thread is gone.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }
}

async fn handle_command(
    orchestrator: &Orchestrator,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Submit { job_id, request } => {
            let sink = ChannelProgressSink::new(event_tx.clone());
            sink.stage(job_id, Stage::Queued);
            let result = orchestrator.run_job(job_id, &request, &sink).await;
            let _ = event_tx.send(EngineEvent::RunCompleted { job_id, result });
        }
    }
}
