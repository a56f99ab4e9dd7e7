// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! [`RunRecord`]/[`NodeRecord`] (§3): the execution ledger a run leaves
//! behind, independent of how it is persisted.

use oneiric_core::RunId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
}

/// One workflow execution (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id: RunId,
    pub workflow_key: String,
    pub started_at: u64,
    pub ended_at: Option<u64>,
    pub status: RunStatus,
    pub error: Option<String>,
}

impl RunRecord {
    pub fn new(run_id: RunId, workflow_key: impl Into<String>, started_at: u64) -> Self {
        Self {
            run_id,
            workflow_key: workflow_key.into(),
            started_at,
            ended_at: None,
            status: RunStatus::Running,
            error: None,
        }
    }
}

/// Per-node outcome within a run (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRecord {
    pub run_id: RunId,
    pub node_key: String,
    pub status: NodeStatus,
    pub started_at: u64,
    pub ended_at: Option<u64>,
    pub attempts: u32,
    pub error: Option<String>,
}
