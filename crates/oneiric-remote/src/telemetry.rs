// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! The remote loader's half of the Telemetry Writer (§4.10): a sync
//! result is reported through this trait rather than written directly to
//! `runtime_telemetry.json`, since that file also aggregates event
//! dispatch and workflow run summaries the runtime aggregate owns — one
//! writer, many contributors, avoids two components racing on one file.

use oneiric_core::OneiricError;
use serde::Serialize;

/// A sync failure's stable kind plus its human-readable message (§6
/// `last_error.kind`/`last_error.message` in `remote_status.json`).
#[derive(Debug, Clone, Serialize)]
pub struct RemoteSyncError {
    pub kind: &'static str,
    pub message: String,
}

impl From<&OneiricError> for RemoteSyncError {
    fn from(error: &OneiricError) -> Self {
        Self { kind: error.kind_name(), message: error.to_string() }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RemoteSyncResult {
    pub source: String,
    pub changed: bool,
    pub digest: String,
    pub entry_count: usize,
    pub synced_at: u64,
    pub last_error: Option<RemoteSyncError>,
}

pub trait TelemetrySink: Send + Sync {
    fn record_remote_sync(&self, result: &RemoteSyncResult) -> Result<(), OneiricError>;
}

/// No-op sink for loaders run without telemetry wiring (tests, one-off CLI
/// invocations of `orchestrate --no-remote`'s opposite case).
pub struct NullTelemetrySink;

impl TelemetrySink for NullTelemetrySink {
    fn record_remote_sync(&self, _result: &RemoteSyncResult) -> Result<(), OneiricError> {
        Ok(())
    }
}
