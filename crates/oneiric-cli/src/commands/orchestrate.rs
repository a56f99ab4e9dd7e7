// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

use oneiric_core::Domain;
use oneiric_runtime::Runtime;
use std::path::Path;
use tracing::info;

use crate::exit_error::ExitError;
use crate::workflows;

/// `orchestrate [--print-dag --workflow W]` — print a workflow's compiled
/// layers without running it, then exit.
pub async fn print_dag(definitions_dir: &Path, workflow_key: &str) -> Result<(), ExitError> {
    let definition = workflows::load(definitions_dir, workflow_key)?;
    let layers = oneiric_workflow::compile(workflow_key, &definition).map_err(ExitError::from)?;
    println!("{}", serde_json::to_string_pretty(&layers).unwrap_or_default());
    Ok(())
}

/// `orchestrate [--events --inspect-json [--topic T]]` — dump the event
/// domain's registered candidates, optionally scoped to one topic, then
/// exit.
pub fn inspect_events(runtime: &Runtime, topic: Option<&str>) -> Result<(), ExitError> {
    let candidates = runtime.resolver.registry_list(Domain::Event, topic);
    println!("{}", serde_json::to_string_pretty(&candidates).unwrap_or_default());
    Ok(())
}

/// `orchestrate [--profile P] [--no-remote] [--health-path PATH]` — boot the
/// full runtime and block until cooperatively cancelled (SIGINT).
pub async fn run(runtime: Runtime) -> Result<(), ExitError> {
    info!("runtime orchestration started");
    tokio::signal::ctrl_c().await.map_err(|error| ExitError::new(1, error.to_string()))?;
    info!("shutdown signal received, draining");
    runtime.shutdown().await;
    Ok(())
}
