use super::*;
use oneiric_core::RunId;
use oneiric_workflow::NodeStatus;
use serde_json::json;

fn checkpoint(status: NodeStatus, attempts: u32) -> NodeCheckpoint {
    NodeCheckpoint { status, attempts, started_at: 10, ended_at: Some(20), error: None, result: None }
}

#[tokio::test]
async fn save_then_load_round_trips_a_checkpoint() {
    let store = SqliteCheckpointStore::open_in_memory().unwrap();
    store
        .save(
            "run-1",
            "a",
            NodeCheckpoint {
                status: NodeStatus::Succeeded,
                attempts: 2,
                started_at: 10,
                ended_at: Some(20),
                error: None,
                result: Some(json!({"ok": true})),
            },
        )
        .await
        .unwrap();

    let loaded = store.load("run-1").await.unwrap();
    let checkpoint = &loaded["a"];
    assert_eq!(checkpoint.status, NodeStatus::Succeeded);
    assert_eq!(checkpoint.attempts, 2);
    assert_eq!(checkpoint.started_at, 10);
    assert_eq!(checkpoint.ended_at, Some(20));
    assert_eq!(checkpoint.result, Some(json!({"ok": true})));
}

#[tokio::test]
async fn saving_the_same_node_twice_replaces_the_row_instead_of_duplicating_it() {
    let store = SqliteCheckpointStore::open_in_memory().unwrap();
    store.save("run-1", "a", checkpoint(NodeStatus::Running, 1)).await.unwrap();
    store
        .save(
            "run-1",
            "a",
            NodeCheckpoint {
                status: NodeStatus::Failed,
                attempts: 2,
                started_at: 10,
                ended_at: Some(30),
                error: Some("boom".to_string()),
                result: None,
            },
        )
        .await
        .unwrap();

    let loaded = store.load("run-1").await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded["a"].status, NodeStatus::Failed);
    assert_eq!(loaded["a"].error.as_deref(), Some("boom"));
}

#[tokio::test]
async fn rows_from_one_run_do_not_leak_into_another() {
    let store = SqliteCheckpointStore::open_in_memory().unwrap();
    store.save("run-1", "a", checkpoint(NodeStatus::Succeeded, 1)).await.unwrap();
    store.save("run-2", "a", checkpoint(NodeStatus::Pending, 0)).await.unwrap();

    assert_eq!(store.load("run-1").await.unwrap()["a"].status, NodeStatus::Succeeded);
    assert_eq!(store.load("run-2").await.unwrap()["a"].status, NodeStatus::Pending);
}

#[tokio::test]
async fn clear_removes_every_row_for_a_run_but_leaves_others_intact() {
    let store = SqliteCheckpointStore::open_in_memory().unwrap();
    store.save("run-1", "a", checkpoint(NodeStatus::Succeeded, 1)).await.unwrap();
    store.save("run-2", "a", checkpoint(NodeStatus::Succeeded, 1)).await.unwrap();

    store.clear("run-1").await.unwrap();

    assert!(store.load("run-1").await.unwrap().is_empty());
    assert!(!store.load("run-2").await.unwrap().is_empty());
}

#[tokio::test]
async fn a_fresh_database_survives_reopening_at_the_same_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("checkpoints.sqlite");

    {
        let store = SqliteCheckpointStore::open(&path).unwrap();
        store.save("run-1", "a", checkpoint(NodeStatus::Succeeded, 1)).await.unwrap();
    }

    let reopened = SqliteCheckpointStore::open(&path).unwrap();
    let loaded = reopened.load("run-1").await.unwrap();
    assert_eq!(loaded["a"].status, NodeStatus::Succeeded);
}

#[tokio::test]
async fn save_run_then_load_run_round_trips_a_run_record() {
    let store = SqliteCheckpointStore::open_in_memory().unwrap();
    let run_id = RunId::new();
    let mut run = RunRecord::new(run_id, "build", 100);
    store.save_run(&run).await.unwrap();

    run.status = RunStatus::Succeeded;
    run.ended_at = Some(500);
    store.save_run(&run).await.unwrap();

    let loaded = store.load_run(run_id.as_str()).await.unwrap().unwrap();
    assert_eq!(loaded.workflow_key, "build");
    assert_eq!(loaded.status, RunStatus::Succeeded);
    assert_eq!(loaded.started_at, 100);
    assert_eq!(loaded.ended_at, Some(500));
}

#[tokio::test]
async fn unknown_run_ids_load_run_as_none() {
    let store = SqliteCheckpointStore::open_in_memory().unwrap();
    assert!(store.load_run("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn clearing_a_run_also_removes_its_run_record() {
    let store = SqliteCheckpointStore::open_in_memory().unwrap();
    let run_id = RunId::new();
    store.save_run(&RunRecord::new(run_id, "build", 0)).await.unwrap();
    store.clear(run_id.as_str()).await.unwrap();
    assert!(store.load_run(run_id.as_str()).await.unwrap().is_none());
}

#[tokio::test]
async fn a_fresh_database_survives_reopening_a_run_record_at_the_same_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("checkpoints.sqlite");
    let run_id = RunId::new();

    {
        let store = SqliteCheckpointStore::open(&path).unwrap();
        store.save_run(&RunRecord::new(run_id, "build", 42)).await.unwrap();
    }

    let reopened = SqliteCheckpointStore::open(&path).unwrap();
    let loaded = reopened.load_run(run_id.as_str()).await.unwrap().unwrap();
    assert_eq!(loaded.started_at, 42);
}
