// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! SQLite-backed [`CheckpointStore`] (§4.6): one row per `(run_id,
//! node_key)`, giving workflow resume atomic per-row writes and survival
//! across process restarts — the guarantee `InMemoryCheckpointStore` can't
//! offer. `rusqlite` runs synchronously, so every query goes through
//! `spawn_blocking` the same way the teacher dispatches blocking calls off
//! the async runtime's worker threads.

use async_trait::async_trait;
use oneiric_core::{OneiricError, RunId};
use oneiric_workflow::{CheckpointStore, NodeCheckpoint, NodeStatus, RunRecord, RunStatus};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// §6: `workflow_checkpoints.sqlite` is a single-writer embedded store of
/// `RunRecord` and `NodeRecord` — one table per record kind, both keyed so a
/// reader that only has `run_id` can recover full run status and timing
/// without replaying the executor.
const CREATE_TABLE: &str = "
CREATE TABLE IF NOT EXISTS workflow_checkpoints (
    run_id     TEXT NOT NULL,
    node_key   TEXT NOT NULL,
    status     TEXT NOT NULL,
    attempts   INTEGER NOT NULL,
    started_at INTEGER NOT NULL,
    ended_at   INTEGER,
    error      TEXT,
    result     TEXT,
    PRIMARY KEY (run_id, node_key)
);
CREATE TABLE IF NOT EXISTS workflow_runs (
    run_id       TEXT NOT NULL PRIMARY KEY,
    workflow_key TEXT NOT NULL,
    status       TEXT NOT NULL,
    started_at   INTEGER NOT NULL,
    ended_at     INTEGER,
    error        TEXT
)";

pub struct SqliteCheckpointStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteCheckpointStore {
    pub fn open(path: &Path) -> Result<Self, OneiricError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(OneiricError::Io)?;
        }
        let conn = Connection::open(path).map_err(storage_error)?;
        conn.execute_batch(CREATE_TABLE).map_err(storage_error)?;
        Ok(Self { conn: Arc::new(Mutex::new(conn)) })
    }

    /// In-memory SQLite database, for tests that want the real row format
    /// without touching the filesystem.
    pub fn open_in_memory() -> Result<Self, OneiricError> {
        let conn = Connection::open_in_memory().map_err(storage_error)?;
        conn.execute_batch(CREATE_TABLE).map_err(storage_error)?;
        Ok(Self { conn: Arc::new(Mutex::new(conn)) })
    }
}

fn storage_error(error: rusqlite::Error) -> OneiricError {
    OneiricError::Storage(error.to_string())
}

fn join_error(error: tokio::task::JoinError) -> OneiricError {
    OneiricError::Storage(format!("sqlite task panicked: {error}"))
}

#[async_trait]
impl CheckpointStore for SqliteCheckpointStore {
    async fn load(&self, run_id: &str) -> Result<HashMap<String, NodeCheckpoint>, OneiricError> {
        let conn = self.conn.clone();
        let run_id = run_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock();
            let mut stmt = conn
                .prepare(
                    "SELECT node_key, status, attempts, started_at, ended_at, error, result
                     FROM workflow_checkpoints WHERE run_id = ?1",
                )
                .map_err(storage_error)?;
            let rows = stmt
                .query_map(params![run_id], |row| {
                    let node_key: String = row.get(0)?;
                    let status: String = row.get(1)?;
                    let attempts: u32 = row.get(2)?;
                    let started_at: u64 = row.get(3)?;
                    let ended_at: Option<u64> = row.get(4)?;
                    let error: Option<String> = row.get(5)?;
                    let result: Option<String> = row.get(6)?;
                    Ok((node_key, status, attempts, started_at, ended_at, error, result))
                })
                .map_err(storage_error)?;

            let mut checkpoints = HashMap::new();
            for row in rows {
                let (node_key, status, attempts, started_at, ended_at, error, result) = row.map_err(storage_error)?;
                let status: NodeStatus = serde_json::from_str(&format!("\"{status}\"")).map_err(OneiricError::Serde)?;
                let result = result
                    .map(|raw| serde_json::from_str(&raw))
                    .transpose()
                    .map_err(OneiricError::Serde)?;
                checkpoints.insert(node_key, NodeCheckpoint { status, attempts, started_at, ended_at, error, result });
            }
            Ok(checkpoints)
        })
        .await
        .map_err(join_error)?
    }

    async fn save(&self, run_id: &str, node_key: &str, checkpoint: NodeCheckpoint) -> Result<(), OneiricError> {
        let conn = self.conn.clone();
        let run_id = run_id.to_string();
        let node_key = node_key.to_string();
        let status = serde_json::to_string(&checkpoint.status)
            .map_err(OneiricError::Serde)?
            .trim_matches('"')
            .to_string();
        let result = checkpoint.result.map(|value| serde_json::to_string(&value)).transpose().map_err(OneiricError::Serde)?;

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock();
            conn.execute(
                "INSERT INTO workflow_checkpoints (run_id, node_key, status, attempts, started_at, ended_at, error, result)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 ON CONFLICT(run_id, node_key) DO UPDATE SET
                     status = excluded.status,
                     attempts = excluded.attempts,
                     started_at = excluded.started_at,
                     ended_at = excluded.ended_at,
                     error = excluded.error,
                     result = excluded.result",
                params![
                    run_id,
                    node_key,
                    status,
                    checkpoint.attempts,
                    checkpoint.started_at,
                    checkpoint.ended_at,
                    checkpoint.error,
                    result
                ],
            )
            .map_err(storage_error)?;
            Ok(())
        })
        .await
        .map_err(join_error)?
    }

    async fn clear(&self, run_id: &str) -> Result<(), OneiricError> {
        let conn = self.conn.clone();
        let run_id = run_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock();
            conn.execute("DELETE FROM workflow_checkpoints WHERE run_id = ?1", params![run_id]).map_err(storage_error)?;
            conn.execute("DELETE FROM workflow_runs WHERE run_id = ?1", params![run_id]).map_err(storage_error)?;
            Ok(())
        })
        .await
        .map_err(join_error)?
    }

    async fn save_run(&self, run: &RunRecord) -> Result<(), OneiricError> {
        let conn = self.conn.clone();
        let run_id = run.run_id.as_str().to_string();
        let workflow_key = run.workflow_key.clone();
        let status =
            serde_json::to_string(&run.status).map_err(OneiricError::Serde)?.trim_matches('"').to_string();
        let started_at = run.started_at;
        let ended_at = run.ended_at;
        let error = run.error.clone();

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock();
            conn.execute(
                "INSERT INTO workflow_runs (run_id, workflow_key, status, started_at, ended_at, error)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(run_id) DO UPDATE SET
                     status = excluded.status,
                     ended_at = excluded.ended_at,
                     error = excluded.error",
                params![run_id, workflow_key, status, started_at, ended_at, error],
            )
            .map_err(storage_error)?;
            Ok(())
        })
        .await
        .map_err(join_error)?
    }

    async fn load_run(&self, run_id: &str) -> Result<Option<RunRecord>, OneiricError> {
        let conn = self.conn.clone();
        let run_id = run_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock();
            let row = conn
                .query_row(
                    "SELECT run_id, workflow_key, status, started_at, ended_at, error
                     FROM workflow_runs WHERE run_id = ?1",
                    params![run_id],
                    |row| {
                        let run_id: String = row.get(0)?;
                        let workflow_key: String = row.get(1)?;
                        let status: String = row.get(2)?;
                        let started_at: u64 = row.get(3)?;
                        let ended_at: Option<u64> = row.get(4)?;
                        let error: Option<String> = row.get(5)?;
                        Ok((run_id, workflow_key, status, started_at, ended_at, error))
                    },
                )
                .optional()
                .map_err(storage_error)?;

            let Some((run_id, workflow_key, status, started_at, ended_at, error)) = row else {
                return Ok(None);
            };
            let status: RunStatus = serde_json::from_str(&format!("\"{status}\"")).map_err(OneiricError::Serde)?;
            Ok(Some(RunRecord {
                run_id: RunId::from_string(run_id),
                workflow_key,
                started_at,
                ended_at,
                status,
                error,
            }))
        })
        .await
        .map_err(join_error)?
    }
}

#[cfg(test)]
#[path = "sqlite_checkpoint_tests.rs"]
mod tests;
