// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! The checkpoint store abstraction (§4.6): keyed by `run_id`, giving
//! idempotent resume its `status == succeeded` skip check. `oneiric-storage`
//! supplies the persisted implementation; the engine only needs the trait.

use crate::record::{NodeStatus, RunRecord};
use async_trait::async_trait;
use oneiric_core::OneiricError;
use serde_json::Value;
use std::collections::HashMap;

/// One node's persisted progress within a run (§3 `NodeRecord`, minus the
/// `run_id`/`node_key` that already key this row).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct NodeCheckpoint {
    pub status: NodeStatus,
    pub attempts: u32,
    pub started_at: u64,
    pub ended_at: Option<u64>,
    pub error: Option<String>,
    /// The node's own output, folded into later nodes' `payload_with_prior_results`.
    pub result: Option<Value>,
}

/// Persistence abstraction for workflow run progress (§4.6, §6: "single-writer
/// embedded store of RunRecord and NodeRecord"). Implementations only need
/// atomic per-row writes; the engine never assumes more.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    async fn load(&self, run_id: &str) -> Result<HashMap<String, NodeCheckpoint>, OneiricError>;
    async fn save(&self, run_id: &str, node_key: &str, checkpoint: NodeCheckpoint) -> Result<(), OneiricError>;
    async fn clear(&self, run_id: &str) -> Result<(), OneiricError>;

    /// Persists the run-level record (§4.6 step 1's `start_run`/`finish_run`):
    /// called once on start and again whenever `status`/`ended_at` changes.
    async fn save_run(&self, run: &RunRecord) -> Result<(), OneiricError>;
    async fn load_run(&self, run_id: &str) -> Result<Option<RunRecord>, OneiricError>;
}

/// In-memory store: used by tests here and as the default when no durable
/// backend is wired in (no resume guarantee across process restarts).
#[derive(Default)]
pub struct InMemoryCheckpointStore {
    rows: parking_lot::Mutex<HashMap<String, HashMap<String, NodeCheckpoint>>>,
    runs: parking_lot::Mutex<HashMap<String, RunRecord>>,
}

impl InMemoryCheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CheckpointStore for InMemoryCheckpointStore {
    async fn load(&self, run_id: &str) -> Result<HashMap<String, NodeCheckpoint>, OneiricError> {
        Ok(self.rows.lock().get(run_id).cloned().unwrap_or_default())
    }

    async fn save(&self, run_id: &str, node_key: &str, checkpoint: NodeCheckpoint) -> Result<(), OneiricError> {
        self.rows.lock().entry(run_id.to_string()).or_default().insert(node_key.to_string(), checkpoint);
        Ok(())
    }

    async fn clear(&self, run_id: &str) -> Result<(), OneiricError> {
        self.rows.lock().remove(run_id);
        Ok(())
    }

    async fn save_run(&self, run: &RunRecord) -> Result<(), OneiricError> {
        self.runs.lock().insert(run.run_id.as_str().to_string(), run.clone());
        Ok(())
    }

    async fn load_run(&self, run_id: &str) -> Result<Option<RunRecord>, OneiricError> {
        Ok(self.runs.lock().get(run_id).cloned())
    }
}
