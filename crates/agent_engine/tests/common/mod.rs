#![allow(dead_code)]

use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use agent_engine::{EngineEvent, ProgressSink, RunProgress, Stage, WorkerSettings};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(agent_logging::initialize_for_tests);
}

/// Worker that runs `script` under `sh -c`.
pub fn sh_worker(script: &str, timeout: Duration) -> WorkerSettings {
    WorkerSettings {
        program: "sh".into(),
        args: vec!["-c".into(), script.into()],
        working_dir: None,
        timeout,
    }
}

/// Worker that reads its request and prints `envelope`.
pub fn replying_worker(envelope: &str) -> WorkerSettings {
    sh_worker(
        &format!("cat >/dev/null; printf '%s\\n' '{envelope}'"),
        Duration::from_secs(30),
    )
}

#[derive(Default)]
pub struct TestSink {
    events: Arc<Mutex<Vec<EngineEvent>>>,
}

impl TestSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stages(&self) -> Vec<Stage> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                EngineEvent::Progress(RunProgress { stage, .. }) => Some(*stage),
                _ => None,
            })
            .collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}
