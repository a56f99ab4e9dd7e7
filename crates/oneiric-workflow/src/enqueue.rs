// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! `enqueue(workflow_key, payload)` (§4.6): picks a queue adapter by
//! `metadata.scheduler` (strongest), then the bridge-default
//! `queue_category`, then a global default — resolved this way per the
//! precedence spec.md itself settles on for this otherwise-ambiguous path.

use crate::definition::WorkflowDefinition;
use oneiric_core::{Domain, OneiricError, SharedQueueAdapter};
use oneiric_lifecycle::LifecycleManager;
use serde_json::Value;
use std::sync::Arc;

/// Resolve and invoke the winning queue adapter for a workflow's `enqueue`.
pub async fn enqueue(
    lifecycle: &LifecycleManager,
    workflow_key: &str,
    definition: &WorkflowDefinition,
    payload: Value,
    default_queue_category: Option<&str>,
) -> Result<String, OneiricError> {
    let category = definition
        .scheduler
        .as_ref()
        .map(|hint| hint.queue_category.as_str())
        .or(default_queue_category)
        .ok_or_else(|| OneiricError::NoQueueAdapter(workflow_key.to_string()))?;

    let provider = definition.scheduler.as_ref().and_then(|hint| hint.provider.as_deref());

    let handle = match provider {
        Some(provider) => lifecycle.activate_as(Domain::Adapter, category, provider).await?,
        None => lifecycle.activate(Domain::Adapter, category).await?,
    };

    let adapter: Arc<SharedQueueAdapter> = handle
        .downcast::<SharedQueueAdapter>()
        .ok_or_else(|| OneiricError::Handler("resolved candidate is not a QueueAdapter".to_string()))?;

    adapter.enqueue(workflow_key, payload).await.map_err(OneiricError::Handler)
}

#[cfg(test)]
#[path = "enqueue_tests.rs"]
mod tests;
