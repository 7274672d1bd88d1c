#![cfg(unix)]

mod common;

use std::collections::BTreeMap;

use agent_core::{AgentRequest, AgentRunResult};
use agent_engine::{EngineEvent, EngineHandle, Orchestrator, RunProgress, Stage};
use common::{init_logging, replying_worker};

#[test]
fn submitted_runs_each_complete_once() {
    init_logging();
    let engine = EngineHandle::new(Orchestrator::new(replying_worker(
        r#"{"success": true, "result": {"feedback": "done"}}"#,
    )));
    engine.submit(1, AgentRequest::new("first", None).unwrap());
    engine.submit(2, AgentRequest::new("second", None).unwrap());

    let mut completed: BTreeMap<u64, AgentRunResult> = BTreeMap::new();
    let mut stages: Vec<(u64, Stage)> = Vec::new();
    while completed.len() < 2 {
        match engine.recv().expect("engine alive") {
            EngineEvent::Progress(RunProgress { job_id, stage }) => stages.push((job_id, stage)),
            EngineEvent::RunCompleted { job_id, result } => {
                assert!(completed.insert(job_id, result).is_none());
            }
        }
    }

    assert_eq!(completed.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
    for result in completed.values() {
        assert_eq!(result.messages[0].content, "Latest feedback: done");
    }
    assert!(stages.contains(&(1, Stage::Queued)));
    assert!(stages.contains(&(2, Stage::Done)));
    assert!(engine.try_recv().is_none());
}
