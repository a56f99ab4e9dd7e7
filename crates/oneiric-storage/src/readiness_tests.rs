use super::*;
use std::collections::HashMap;

#[test]
fn writes_a_readable_snapshot_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("runtime_health.json");
    let sink = FileReadinessSink::new(&path);

    let snapshot = ReadinessSnapshot {
        watchers_running: true,
        remote_enabled: false,
        profile: "serverless".to_string(),
        secrets_ok: true,
        activity_state: HashMap::new(),
        lifecycle_state: HashMap::new(),
    };

    sink.write(&snapshot).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("\"profile\": \"serverless\""));
}
