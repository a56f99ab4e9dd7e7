// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

use oneiric_runtime::{Runtime, WorkflowRunSummary};
use oneiric_workflow::SchedulerHint;
use std::path::Path;

use crate::exit_error::ExitError;
use crate::output::{format_or_json, OutputFormat};
use crate::workflows;

/// `workflow run K --context JSON [--json]`.
pub async fn handle_run(
    runtime: &Runtime,
    definitions_dir: &Path,
    workflow_key: &str,
    context: serde_json::Value,
    format: OutputFormat,
) -> Result<(), ExitError> {
    let definition = workflows::load(definitions_dir, workflow_key)?;

    let (run, nodes) = runtime.workflow_executor.run(workflow_key, &definition, context, None).await;

    runtime
        .telemetry
        .record_workflow_run(WorkflowRunSummary { run: run.clone(), nodes: nodes.clone() })
        .map_err(ExitError::from)?;

    if run.status == oneiric_workflow::RunStatus::Failed {
        let error = run.error.clone().unwrap_or_else(|| "workflow run failed".to_string());
        format_or_json(format, &(run, nodes), || println!("run failed: {error}")).map_err(|e| ExitError::new(1, e.to_string()))?;
        return Err(ExitError::new(5, error));
    }

    format_or_json(format, &(run.clone(), nodes), || {
        println!("run {} — status={:?}", run.run_id, run.status);
    })
    .map_err(|error| ExitError::new(1, error.to_string()))
}

/// `workflow enqueue K [--queue-category C] [--provider P] [--json]`.
pub async fn handle_enqueue(
    runtime: &Runtime,
    definitions_dir: &Path,
    workflow_key: &str,
    queue_category: Option<&str>,
    provider: Option<&str>,
    format: OutputFormat,
) -> Result<(), ExitError> {
    let mut definition = workflows::load(definitions_dir, workflow_key)?;

    if queue_category.is_some() || provider.is_some() {
        let hint = definition.scheduler.get_or_insert_with(|| SchedulerHint {
            queue_category: queue_category.unwrap_or_default().to_string(),
            provider: None,
        });
        if let Some(category) = queue_category {
            hint.queue_category = category.to_string();
        }
        if provider.is_some() {
            hint.provider = provider.map(str::to_string);
        }
    }

    let ticket = oneiric_workflow::enqueue(&runtime.lifecycle, workflow_key, &definition, serde_json::Value::Null, None)
        .await
        .map_err(ExitError::from)?;

    format_or_json(format, &ticket, || println!("enqueued: {ticket}")).map_err(|error| ExitError::new(1, error.to_string()))
}
