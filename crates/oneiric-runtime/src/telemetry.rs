// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! The Telemetry Writer (§4.10): the runtime aggregate's merged view of
//! remote sync, event dispatch, and workflow run summaries, persisted to
//! `runtime_telemetry.json` through the same atomic-write helper the
//! Supervisor's readiness snapshot and `oneiric-remote`'s artifact cache
//! use. `oneiric-remote` reports through [`oneiric_remote::TelemetrySink`]
//! rather than writing either file itself, since both are shared across
//! three independent contributors (§4.7's deferral). A remote sync also
//! gets its own standalone `remote_status.json` (§6's persisted-state
//! layout), written alongside the merged document so a watcher can poll
//! the latest sync result without parsing the larger one.

use oneiric_bridges::HandlerResult;
use oneiric_core::OneiricError;
use oneiric_remote::{RemoteSyncResult, TelemetrySink};
use oneiric_workflow::{NodeRecord, RunRecord};
use parking_lot::Mutex;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize)]
pub struct EventDispatchSummary {
    pub topic: String,
    pub handlers: Vec<HandlerResult>,
    pub dispatched_at: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkflowRunSummary {
    pub run: RunRecord,
    pub nodes: Vec<NodeRecord>,
}

#[derive(Debug, Clone, Default, Serialize)]
struct TelemetryDocument {
    last_remote_sync: Option<RemoteSyncResult>,
    last_event_dispatch: Option<EventDispatchSummary>,
    last_workflow_run: Option<WorkflowRunSummary>,
}

/// Aggregates contributions from the remote loader, event dispatcher, and
/// workflow executor into one `runtime_telemetry.json` document.
pub struct TelemetryWriter {
    path: PathBuf,
    remote_status_path: PathBuf,
    document: Mutex<TelemetryDocument>,
}

impl TelemetryWriter {
    pub fn new(path: PathBuf, remote_status_path: PathBuf) -> Self {
        Self { path, remote_status_path, document: Mutex::new(TelemetryDocument::default()) }
    }

    pub fn record_event_dispatch(&self, summary: EventDispatchSummary) -> Result<(), OneiricError> {
        self.document.lock().last_event_dispatch = Some(summary);
        self.flush()
    }

    pub fn record_workflow_run(&self, summary: WorkflowRunSummary) -> Result<(), OneiricError> {
        self.document.lock().last_workflow_run = Some(summary);
        self.flush()
    }

    fn flush(&self) -> Result<(), OneiricError> {
        let document = self.document.lock();
        oneiric_storage::write_atomic(&self.path, &*document)
    }
}

impl TelemetrySink for TelemetryWriter {
    fn record_remote_sync(&self, result: &RemoteSyncResult) -> Result<(), OneiricError> {
        self.document.lock().last_remote_sync = Some(result.clone());
        self.flush()?;
        oneiric_storage::write_atomic(&self.remote_status_path, result)
    }
}

#[cfg(test)]
#[path = "telemetry_tests.rs"]
mod tests;
