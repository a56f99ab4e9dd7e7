use super::*;
use async_trait::async_trait;
use oneiric_core::candidate::{Candidate, CandidateId, CandidateMetadata, Capabilities, Factory};
use oneiric_core::{FakeClock, Instance, NoHooks, Source, TaskRunner};
use oneiric_registry::{CandidateRegistry, Resolver};
use std::sync::atomic::{AtomicU32, Ordering};

struct AddOneTask {
    calls: Arc<AtomicU32>,
    fail_first_n: u32,
}

#[async_trait]
impl TaskRunner for AddOneTask {
    async fn run(&self, payload: Value) -> Result<Value, String> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n < self.fail_first_n {
            return Err("not yet".to_string());
        }
        let input = payload.pointer("/context/n").and_then(Value::as_i64).unwrap_or(0);
        Ok(serde_json::json!({ "n": input + 1 }))
    }
}

struct TaskFactory(Arc<AtomicU32>, u32);

impl Factory for TaskFactory {
    fn build(&self, _settings: Value) -> Result<Instance, String> {
        let runner: SharedTaskRunner = Arc::new(AddOneTask { calls: self.0.clone(), fail_first_n: self.1 });
        Ok(Arc::new(runner) as Instance)
    }
}

fn task_candidate(key: &str, provider: &str, fail_first_n: u32, calls: Arc<AtomicU32>) -> Candidate {
    Candidate {
        id: CandidateId { domain: Domain::Task, key: key.to_string(), provider: provider.to_string() },
        priority: 0,
        stack_level: 0,
        source: Source::LocalPkg,
        source_order: 0,
        capabilities: Capabilities::default(),
        metadata: CandidateMetadata::default(),
        factory: Arc::new(TaskFactory(calls, fail_first_n)),
        hooks: Arc::new(NoHooks),
        registered_at: 0,
    }
}

fn setup() -> (Arc<LifecycleManager>, Arc<CandidateRegistry>) {
    let registry = Arc::new(CandidateRegistry::new());
    let resolver = Arc::new(Resolver::new(registry.clone()));
    (Arc::new(LifecycleManager::new(registry.clone(), resolver)), registry)
}

#[tokio::test]
async fn a_linear_workflow_runs_nodes_in_dependency_order() {
    let (lifecycle, registry) = setup();
    registry.register(task_candidate("step_a", "impl", 0, Arc::new(AtomicU32::new(0))), true).unwrap();
    registry.register(task_candidate("step_b", "impl", 0, Arc::new(AtomicU32::new(0))), true).unwrap();

    let mut nodes = indexmap::IndexMap::new();
    nodes.insert("a".to_string(), NodeDefinition { task_key: "step_a".to_string(), ..NodeDefinition::default() });
    nodes.insert(
        "b".to_string(),
        NodeDefinition {
            task_key: "step_b".to_string(),
            depends_on: ["a".to_string()].into_iter().collect(),
            ..NodeDefinition::default()
        },
    );
    let definition = WorkflowDefinition::new(nodes);

    let checkpoints: Arc<dyn CheckpointStore> = Arc::new(InMemoryCheckpointStore::new());
    let executor = WorkflowExecutor::with_clock(lifecycle, checkpoints, FakeClock::new());

    let (run, node_records) = executor.run("wf", &definition, serde_json::json!({ "n": 0 }), None).await;
    assert_eq!(run.status, RunStatus::Succeeded);
    assert_eq!(node_records.len(), 2);
    assert!(node_records.iter().all(|n| n.status == NodeStatus::Succeeded));
}

#[tokio::test]
async fn a_cyclic_workflow_fails_the_run_without_executing_nodes() {
    let (lifecycle, _registry) = setup();
    let mut nodes = indexmap::IndexMap::new();
    nodes.insert(
        "a".to_string(),
        NodeDefinition {
            task_key: "step_a".to_string(),
            depends_on: ["b".to_string()].into_iter().collect(),
            ..NodeDefinition::default()
        },
    );
    nodes.insert(
        "b".to_string(),
        NodeDefinition {
            task_key: "step_b".to_string(),
            depends_on: ["a".to_string()].into_iter().collect(),
            ..NodeDefinition::default()
        },
    );
    let definition = WorkflowDefinition::new(nodes);

    let checkpoints: Arc<dyn CheckpointStore> = Arc::new(InMemoryCheckpointStore::new());
    let executor = WorkflowExecutor::with_clock(lifecycle, checkpoints, FakeClock::new());

    let (run, node_records) = executor.run("wf", &definition, Value::Null, None).await;
    assert_eq!(run.status, RunStatus::Failed);
    assert!(run.error.unwrap().contains("cycle"));
    assert!(node_records.is_empty());
}

#[tokio::test]
async fn a_node_that_exhausts_retries_fails_the_run() {
    let (lifecycle, registry) = setup();
    registry.register(task_candidate("flaky", "impl", 99, Arc::new(AtomicU32::new(0))), true).unwrap();

    let mut nodes = indexmap::IndexMap::new();
    nodes.insert(
        "a".to_string(),
        NodeDefinition {
            task_key: "flaky".to_string(),
            retry_policy: oneiric_core::RetryPolicy { attempts: 2, ..oneiric_core::RetryPolicy::default() },
            ..NodeDefinition::default()
        },
    );
    let definition = WorkflowDefinition::new(nodes);

    let checkpoints: Arc<dyn CheckpointStore> = Arc::new(InMemoryCheckpointStore::new());
    let executor = WorkflowExecutor::with_clock(lifecycle, checkpoints, FakeClock::new());

    let (run, node_records) = executor.run("wf", &definition, Value::Null, None).await;
    assert_eq!(run.status, RunStatus::Failed);
    assert_eq!(node_records[0].status, NodeStatus::Failed);
    assert_eq!(node_records[0].attempts, 2);
}

#[tokio::test]
async fn resuming_a_run_id_skips_nodes_already_checkpointed_as_succeeded() {
    let (lifecycle, registry) = setup();
    let a_calls = Arc::new(AtomicU32::new(0));
    let b_calls = Arc::new(AtomicU32::new(0));
    registry.register(task_candidate("step_a", "impl", 0, a_calls.clone()), true).unwrap();
    registry.register(task_candidate("step_b", "impl", 0, b_calls.clone()), true).unwrap();

    let mut nodes = indexmap::IndexMap::new();
    nodes.insert("a".to_string(), NodeDefinition { task_key: "step_a".to_string(), ..NodeDefinition::default() });
    nodes.insert("b".to_string(), NodeDefinition { task_key: "step_b".to_string(), ..NodeDefinition::default() });
    let definition = WorkflowDefinition::new(nodes);

    let checkpoints: Arc<dyn CheckpointStore> = Arc::new(InMemoryCheckpointStore::new());
    let run_id = oneiric_core::RunId::new();
    checkpoints
        .save(
            run_id.as_str(),
            "a",
            NodeCheckpoint {
                status: NodeStatus::Succeeded,
                attempts: 1,
                started_at: 0,
                ended_at: Some(0),
                error: None,
                result: Some(Value::from(7)),
            },
        )
        .await
        .unwrap();

    let executor = WorkflowExecutor::with_clock(lifecycle, checkpoints, FakeClock::new());
    let (run, node_records) = executor.run("wf", &definition, Value::Null, Some(run_id)).await;
    assert_eq!(run.status, RunStatus::Succeeded);
    assert_eq!(node_records.len(), 2);
    assert!(node_records.iter().any(|record| record.node_key == "a" && record.status == NodeStatus::Succeeded));
    assert!(node_records.iter().any(|record| record.node_key == "b" && record.status == NodeStatus::Succeeded));
    assert_eq!(a_calls.load(Ordering::SeqCst), 0);
    assert_eq!(b_calls.load(Ordering::SeqCst), 1);
}
