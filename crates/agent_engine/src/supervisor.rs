//! Owns the lifecycle of one worker process per invocation.
use std::process::Stdio;
use std::time::Instant;

use agent_core::{AgentRequest, JobId, RawProcessOutcome};
use agent_logging::{agent_debug, agent_info, agent_warn};
use tokio::io::AsyncWriteExt;
use tokio::process::{ChildStdin, Command};

use crate::collector::spawn_drain;
use crate::runner::{ProgressSink, WorkerRunner};
use crate::{Stage, WorkerSettings};

#[derive(Debug, Clone)]
pub struct ProcessSupervisor {
    settings: WorkerSettings,
}

impl ProcessSupervisor {
    pub fn new(settings: WorkerSettings) -> Self {
        Self { settings }
    }

    fn build_command(&self) -> Command {
        let mut command = Command::new(&self.settings.program);
        command
            .args(&self.settings.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        // Own process group, so a timeout can take down anything the worker started.
        #[cfg(unix)]
        command.process_group(0);
        if let Some(dir) = &self.settings.working_dir {
            command.current_dir(dir);
        }
        command
    }
}

#[async_trait::async_trait]
impl WorkerRunner for ProcessSupervisor {
    async fn run(
        &self,
        job_id: JobId,
        request: &AgentRequest,
        sink: &dyn ProgressSink,
    ) -> RawProcessOutcome {
        let started = Instant::now();
        sink.stage(job_id, Stage::Spawning);

        let payload = match request.to_worker_payload() {
            Ok(payload) => payload,
            Err(err) => {
                return RawProcessOutcome::spawn_failed(format!("could not encode request: {err}"))
            }
        };

        let mut child = match self.build_command().spawn() {
            Ok(child) => child,
            Err(err) => {
                agent_warn!(
                    "job {} could not spawn {:?}: {}",
                    job_id,
                    self.settings.program,
                    err
                );
                let mut outcome = RawProcessOutcome::spawn_failed(err.to_string());
                outcome.elapsed = started.elapsed();
                return outcome;
            }
        };
        agent_info!(
            "job {} spawned worker pid={:?} prompt_len={} image={}",
            job_id,
            child.id(),
            request.prompt().len(),
            request.image_path().is_some()
        );
        sink.stage(job_id, Stage::Running);

        let pid = child.id();
        let stdin = child.stdin.take();
        let mut stdout = spawn_drain(child.stdout.take(), "stdout");
        let mut stderr = spawn_drain(child.stderr.take(), "stderr");

        let completion = async {
            feed_request(job_id, stdin, &payload).await;
            let _ = (&mut stdout.task).await;
            let _ = (&mut stderr.task).await;
            child.wait().await
        };
        let waited = tokio::time::timeout(self.settings.timeout, completion).await;

        let mut outcome = RawProcessOutcome::default();
        match waited {
            Ok(Ok(status)) => {
                outcome.exit_observed = true;
                outcome.exit_code = status.code();
                agent_info!("job {} worker exited with {}", job_id, status);
            }
            Ok(Err(err)) => {
                agent_warn!("job {} could not wait on worker: {}", job_id, err);
            }
            Err(_) => {
                outcome.timed_out = true;
                agent_warn!(
                    "job {} exceeded {:?}; killing worker",
                    job_id,
                    self.settings.timeout
                );
                kill_process_group(job_id, pid);
                if let Err(err) = child.kill().await {
                    agent_debug!("job {} kill after timeout: {}", job_id, err);
                }
                stdout.cancel().await;
                stderr.cancel().await;
            }
        }

        outcome.stdout = stdout.buffer.take();
        outcome.stderr = stderr.buffer.take();
        outcome.elapsed = started.elapsed();
        outcome
    }
}

/// Write the request and close stdin. Failures are logged only; a worker that
/// exits without reading still gets classified from its output.
async fn feed_request(job_id: JobId, stdin: Option<ChildStdin>, payload: &[u8]) {
    let Some(mut stdin) = stdin else {
        return;
    };
    if let Err(err) = stdin.write_all(payload).await {
        agent_warn!("job {} could not write request: {}", job_id, err);
        return;
    }
    if let Err(err) = stdin.shutdown().await {
        agent_debug!("job {} stdin close: {}", job_id, err);
    }
    agent_debug!("job {} wrote {} request bytes", job_id, payload.len());
}

/// SIGKILL the worker's whole process group; the worker is its leader.
#[cfg(unix)]
fn kill_process_group(job_id: JobId, pid: Option<u32>) {
    let Some(pid) = pid else {
        return;
    };
    // SAFETY: kill takes no pointers; a negative pid targets the whole group.
    if unsafe { libc::kill(-(pid as libc::pid_t), libc::SIGKILL) } == 0 {
        return;
    }
    let err = std::io::Error::last_os_error();
    if err.raw_os_error() != Some(libc::ESRCH) {
        agent_warn!("job {} could not kill process group {}: {}", job_id, pid, err);
    }
}

#[cfg(not(unix))]
fn kill_process_group(_job_id: JobId, _pid: Option<u32>) {}
