// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

use oneiric_runtime::Runtime;
use std::path::Path;

use crate::exit_error::ExitError;
use crate::output::OutputFormat;

/// `health [--probe] [--json]` — the last readiness snapshot, optionally
/// forcing a fresh supervisor reconciliation pass first.
pub async fn handle(runtime: &Runtime, readiness_path: &Path, probe: bool, format: OutputFormat) -> Result<(), ExitError> {
    if probe {
        runtime.supervisor.tick().await;
    }

    let contents = std::fs::read_to_string(readiness_path)
        .map_err(|error| ExitError::new(1, format!("reading readiness snapshot {}: {error}", readiness_path.display())))?;
    let snapshot: serde_json::Value = serde_json::from_str(&contents)
        .map_err(|error| ExitError::new(1, format!("parsing readiness snapshot: {error}")))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&snapshot).unwrap_or(contents)),
        OutputFormat::Text => {
            let profile = snapshot.get("profile").and_then(|v| v.as_str()).unwrap_or("-");
            let remote_enabled = snapshot.get("remote_enabled").and_then(|v| v.as_bool()).unwrap_or(false);
            let secrets_ok = snapshot.get("secrets_ok").and_then(|v| v.as_bool()).unwrap_or(false);
            println!("profile={profile} remote_enabled={remote_enabled} secrets_ok={secrets_ok}");
        }
    }
    Ok(())
}
