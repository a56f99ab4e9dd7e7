use super::*;
use oneiric_core::RunId;
use oneiric_remote::RemoteSyncError;

#[test]
fn recording_a_remote_sync_writes_it_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("runtime_telemetry.json");
    let remote_status_path = dir.path().join("remote_status.json");
    let writer = TelemetryWriter::new(path.clone(), remote_status_path);

    let result = RemoteSyncResult {
        source: "manifests-prod".to_string(),
        changed: true,
        digest: "abc123".to_string(),
        entry_count: 4,
        synced_at: 1000,
        last_error: None,
    };
    writer.record_remote_sync(&result).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("manifests-prod"));
    assert!(contents.contains("\"entry_count\": 4"));
}

#[test]
fn later_writes_preserve_earlier_sections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("runtime_telemetry.json");
    let remote_status_path = dir.path().join("remote_status.json");
    let writer = TelemetryWriter::new(path.clone(), remote_status_path);

    writer
        .record_remote_sync(&RemoteSyncResult {
            source: "s".to_string(),
            changed: false,
            digest: "d".to_string(),
            entry_count: 0,
            synced_at: 1,
            last_error: None,
        })
        .unwrap();

    writer
        .record_workflow_run(WorkflowRunSummary {
            run: RunRecord::new(RunId::new(), "build", 10),
            nodes: vec![],
        })
        .unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("\"source\": \"s\""));
    assert!(contents.contains("\"workflow_key\": \"build\""));
}

#[test]
fn remote_sync_failure_is_persisted_to_its_own_status_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("runtime_telemetry.json");
    let remote_status_path = dir.path().join("remote_status.json");
    let writer = TelemetryWriter::new(path, remote_status_path.clone());

    writer
        .record_remote_sync(&RemoteSyncResult {
            source: "manifests-prod".to_string(),
            changed: false,
            digest: "abc123".to_string(),
            entry_count: 0,
            synced_at: 2000,
            last_error: Some(RemoteSyncError { kind: "SignatureInvalid", message: "bad signature".to_string() }),
        })
        .unwrap();

    let contents = std::fs::read_to_string(&remote_status_path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(value["last_error"]["kind"], "SignatureInvalid");
}
