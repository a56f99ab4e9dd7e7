// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! Atomic JSON writes for the small status documents the runtime publishes
//! to disk — `runtime_health.json`, `runtime_telemetry.json`,
//! `remote_status.json` (§4.4, §4.10, §4.7). A reader polling one of these
//! files must never observe a half-written file, so every write goes
//! through a temp file in the same directory, fsynced, then renamed over
//! the target — rename is atomic within one filesystem.

use oneiric_core::OneiricError;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Serialize `value` and atomically replace the file at `path` with it.
pub fn write_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), OneiricError> {
    let bytes = serde_json::to_vec_pretty(value).map_err(OneiricError::Serde)?;
    write_atomic_bytes(path, &bytes)
}

fn write_atomic_bytes(path: &Path, bytes: &[u8]) -> Result<(), OneiricError> {
    let dir = path.parent().ok_or_else(|| OneiricError::Storage(format!("{} has no parent directory", path.display())))?;
    std::fs::create_dir_all(dir).map_err(OneiricError::Io)?;

    let tmp_path = dir.join(format!(".{}.tmp", file_name(path)?));
    {
        let mut tmp_file = std::fs::File::create(&tmp_path).map_err(OneiricError::Io)?;
        tmp_file.write_all(bytes).map_err(OneiricError::Io)?;
        tmp_file.sync_all().map_err(OneiricError::Io)?;
    }
    std::fs::rename(&tmp_path, path).map_err(OneiricError::Io)?;
    Ok(())
}

fn file_name(path: &Path) -> Result<String, OneiricError> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| OneiricError::Storage(format!("{} has no file name", path.display())))
}

#[cfg(test)]
#[path = "atomic_json_tests.rs"]
mod tests;
