// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

use oneiric_runtime::Runtime;
use std::io::Write;

use crate::exit_error::ExitError;
use crate::output::{handle_list, OutputFormat};

/// `event emit --topic T --payload JSON [--json]`.
pub async fn handle_emit(
    runtime: &Runtime,
    topic: &str,
    payload: serde_json::Value,
    format: OutputFormat,
) -> Result<(), ExitError> {
    let results = runtime.event_dispatcher.dispatch(topic, payload, serde_json::Value::Null).await;

    runtime
        .telemetry
        .record_event_dispatch(oneiric_runtime::EventDispatchSummary {
            topic: topic.to_string(),
            handlers: results.clone(),
            dispatched_at: epoch_ms(),
        })
        .map_err(ExitError::from)?;

    handle_list(format, &results, "no handlers matched this topic", |items, out| {
        for result in items {
            let _ = writeln!(
                out,
                "{}/{}  status={:?} attempts={} duration_ms={}",
                result.domain_key, result.provider, result.status, result.attempts, result.duration_ms
            );
        }
    })
    .map_err(|error| ExitError::new(1, error.to_string()))
}

fn epoch_ms() -> u64 {
    std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or(0)
}
