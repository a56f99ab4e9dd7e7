// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! The workflow executor (§4.6): runs a compiled DAG layer by layer,
//! resolving each node's task through the Lifecycle Manager and resuming
//! from checkpoints already marked `succeeded`.

use crate::checkpoint::{CheckpointStore, NodeCheckpoint};
use crate::dag;
use crate::definition::WorkflowDefinition;
use crate::record::{NodeRecord, NodeStatus, RunRecord, RunStatus};
use oneiric_core::{Clock, Domain, RetryPolicy, RunId, SharedTaskRunner, SystemClock};
use oneiric_lifecycle::LifecycleManager;
use serde_json::Value;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Runs workflow DAGs against the `task` domain, persisting progress through
/// a [`CheckpointStore`] so a crashed run can resume without re-executing
/// already-succeeded nodes.
pub struct WorkflowExecutor<C: Clock = SystemClock> {
    lifecycle: Arc<LifecycleManager>,
    checkpoints: Arc<dyn CheckpointStore>,
    clock: C,
}

impl WorkflowExecutor<SystemClock> {
    pub fn new(lifecycle: Arc<LifecycleManager>, checkpoints: Arc<dyn CheckpointStore>) -> Self {
        Self { lifecycle, checkpoints, clock: SystemClock }
    }
}

impl<C: Clock> WorkflowExecutor<C> {
    pub fn with_clock(lifecycle: Arc<LifecycleManager>, checkpoints: Arc<dyn CheckpointStore>, clock: C) -> Self {
        Self { lifecycle, checkpoints, clock }
    }

    /// §4.6 execution algorithm: compile, then run each layer concurrently,
    /// folding successful node results into the shared context for
    /// downstream nodes. Pass `resume_run_id` to re-enter a prior run and
    /// skip nodes its checkpoints already show `succeeded`; omit it to start
    /// a fresh run.
    pub async fn run(
        &self,
        workflow_key: &str,
        definition: &WorkflowDefinition,
        context: Value,
        resume_run_id: Option<RunId>,
    ) -> (RunRecord, Vec<NodeRecord>) {
        let run_id = resume_run_id.unwrap_or_else(RunId::new);
        let started_at = self.clock.epoch_ms();
        let mut run = RunRecord::new(run_id, workflow_key, started_at);
        let mut node_records = Vec::new();
        let _ = self.checkpoints.save_run(&run).await;

        let layers = match dag::compile(workflow_key, definition) {
            Ok(layers) => layers,
            Err(error) => {
                run.status = RunStatus::Failed;
                run.ended_at = Some(self.clock.epoch_ms());
                run.error = Some(error.to_string());
                let _ = self.checkpoints.save_run(&run).await;
                return (run, node_records);
            }
        };

        let existing = self.checkpoints.load(run_id.as_str()).await.unwrap_or_default();
        let mut results: std::collections::HashMap<String, Value> = existing
            .iter()
            .filter_map(|(node_key, checkpoint)| {
                checkpoint.result.clone().map(|result| (node_key.clone(), result))
            })
            .collect();

        for layer in layers {
            let mut set = JoinSet::new();
            for node_key in layer {
                if let Some(checkpoint) = existing.get(&node_key) {
                    if checkpoint.status == NodeStatus::Succeeded {
                        info!(%workflow_key, %node_key, "skipping already-succeeded node");
                        node_records.push(NodeRecord {
                            run_id,
                            node_key: node_key.clone(),
                            status: checkpoint.status,
                            started_at: checkpoint.started_at,
                            ended_at: checkpoint.ended_at,
                            attempts: checkpoint.attempts,
                            error: checkpoint.error.clone(),
                        });
                        continue;
                    }
                }

                let Some(node) = definition.nodes.get(&node_key) else {
                    continue;
                };
                let payload = build_payload(&context, &results);
                let lifecycle = self.lifecycle.clone();
                let checkpoints = self.checkpoints.clone();
                let task_key = node.task_key.clone();
                let retry_policy = node.retry_policy.clone();
                let run_id_str = run_id.as_str().to_string();
                let clock_epoch = self.clock.epoch_ms();

                set.spawn(async move {
                    let (record, result) = run_node(
                        &lifecycle,
                        &checkpoints,
                        &run_id_str,
                        &node_key,
                        &task_key,
                        &retry_policy,
                        payload,
                        clock_epoch,
                    )
                    .await;
                    (node_key, record, result)
                });
            }

            let mut layer_failed = false;
            while let Some(joined) = set.join_next().await {
                match joined {
                    Ok((node_key, record, result)) => {
                        if record.status == NodeStatus::Succeeded {
                            if let Some(result) = result {
                                results.insert(node_key, result);
                            }
                        } else {
                            layer_failed = true;
                        }
                        node_records.push(record);
                    }
                    Err(error) => warn!(%error, "workflow node task panicked"),
                }
            }

            if layer_failed {
                run.status = RunStatus::Failed;
                run.ended_at = Some(self.clock.epoch_ms());
                run.error = Some("one or more nodes failed".to_string());
                let _ = self.checkpoints.save_run(&run).await;
                return (run, node_records);
            }
        }

        run.status = RunStatus::Succeeded;
        run.ended_at = Some(self.clock.epoch_ms());
        let _ = self.checkpoints.save_run(&run).await;
        (run, node_records)
    }
}

fn build_payload(context: &Value, prior_results: &std::collections::HashMap<String, Value>) -> Value {
    serde_json::json!({
        "context": context,
        "prior_results": prior_results,
    })
}

#[allow(clippy::too_many_arguments)]
async fn run_node(
    lifecycle: &LifecycleManager,
    checkpoints: &Arc<dyn CheckpointStore>,
    run_id: &str,
    node_key: &str,
    task_key: &str,
    retry_policy: &RetryPolicy,
    payload: Value,
    started_at: u64,
) -> (NodeRecord, Option<Value>) {
    let mut last_error = None;

    for attempt in 0..retry_policy.attempts {
        if attempt > 0 {
            tokio::time::sleep(retry_policy.delay_for(attempt)).await;
        }

        match invoke_task(lifecycle, task_key, payload.clone()).await {
            Ok(result) => {
                let ended_at = started_at;
                let _ = checkpoints
                    .save(
                        run_id,
                        node_key,
                        NodeCheckpoint {
                            status: NodeStatus::Succeeded,
                            attempts: attempt + 1,
                            started_at,
                            ended_at: Some(ended_at),
                            error: None,
                            result: Some(result.clone()),
                        },
                    )
                    .await;
                let record = NodeRecord {
                    run_id: RunId::from_string(run_id),
                    node_key: node_key.to_string(),
                    status: NodeStatus::Succeeded,
                    started_at,
                    ended_at: Some(ended_at),
                    attempts: attempt + 1,
                    error: None,
                };
                return (record, Some(result));
            }
            Err(message) => last_error = Some(message),
        }
    }

    let ended_at = started_at;
    let _ = checkpoints
        .save(
            run_id,
            node_key,
            NodeCheckpoint {
                status: NodeStatus::Failed,
                attempts: retry_policy.attempts,
                started_at,
                ended_at: Some(ended_at),
                error: last_error.clone(),
                result: None,
            },
        )
        .await;

    let record = NodeRecord {
        run_id: RunId::from_string(run_id),
        node_key: node_key.to_string(),
        status: NodeStatus::Failed,
        started_at,
        ended_at: Some(ended_at),
        attempts: retry_policy.attempts,
        error: last_error,
    };
    (record, None)
}

async fn invoke_task(lifecycle: &LifecycleManager, task_key: &str, payload: Value) -> Result<Value, String> {
    let handle = lifecycle.activate(Domain::Task, task_key).await.map_err(|e| e.to_string())?;
    let runner: Arc<SharedTaskRunner> =
        handle.downcast::<SharedTaskRunner>().ok_or_else(|| "instance is not a TaskRunner".to_string())?;

    lifecycle.begin_operation(Domain::Task, task_key).await;
    let result = runner.run(payload).await;
    lifecycle.end_operation(Domain::Task, task_key).await;
    result
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
