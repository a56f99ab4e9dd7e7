// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

use oneiric_core::{Domain, OneiricError, SharedTaskRunner};
use oneiric_runtime::{NotifyRequest, Runtime};

use crate::exit_error::ExitError;

/// `action-invoke NAME --payload JSON [--workflow W] [--send-notification]
/// [--notify-adapter A] [--notify-target T]` — resolves `NAME` in the task
/// domain and runs it once, outside any workflow's DAG. `--workflow W` is
/// folded into the payload as `_workflow_key` so the task can tell it was
/// triggered as an ad hoc re-run of one workflow's node.
#[allow(clippy::too_many_arguments)]
pub async fn handle(
    runtime: &Runtime,
    name: &str,
    mut payload: serde_json::Value,
    workflow: Option<&str>,
    send_notification: bool,
    notify_adapter: Option<&str>,
    notify_target: Option<&str>,
) -> Result<(), ExitError> {
    if let Some(workflow_key) = workflow {
        if let serde_json::Value::Object(ref mut map) = payload {
            map.insert("_workflow_key".to_string(), serde_json::Value::String(workflow_key.to_string()));
        }
    }

    let handle = runtime.lifecycle.activate(Domain::Task, name).await.map_err(ExitError::from)?;
    let runner = handle
        .downcast::<SharedTaskRunner>()
        .ok_or_else(|| ExitError::from(OneiricError::Handler(format!("{name} is not a TaskRunner"))))?;

    runtime.lifecycle.begin_operation(Domain::Task, name).await;
    let run_result = runner.run(payload).await;
    runtime.lifecycle.end_operation(Domain::Task, name).await;
    let result = run_result.map_err(|error| ExitError::from(OneiricError::Handler(error)))?;
    println!("{}", serde_json::to_string_pretty(&result).unwrap_or_else(|_| result.to_string()));

    if send_notification {
        let adapter = notify_adapter
            .ok_or_else(|| ExitError::new(2, "--send-notification requires --notify-adapter".to_string()))?;
        let target = notify_target
            .ok_or_else(|| ExitError::new(2, "--send-notification requires --notify-target".to_string()))?;
        let request = NotifyRequest {
            channel: adapter.to_string(),
            level: "info".to_string(),
            message: format!("action {name} completed"),
            context: result,
        };
        runtime.notifications.route(request, target).await.map_err(ExitError::from)?;
    }

    Ok(())
}
