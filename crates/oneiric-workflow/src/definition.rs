// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! [`WorkflowDefinition`] (§3): the DAG of task nodes the engine compiles
//! and executes.

use indexmap::IndexMap;
use oneiric_core::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One node in a workflow's DAG.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeDefinition {
    /// Key looked up in the `task` domain to resolve the runner.
    pub task_key: String,
    pub depends_on: BTreeSet<String>,
    pub retry_policy: RetryPolicy,
    /// Operator hint forwarded to the queue adapter, not consulted by the
    /// DAG compiler itself.
    pub queue_hint: Option<String>,
}

impl Default for NodeDefinition {
    fn default() -> Self {
        Self {
            task_key: String::new(),
            depends_on: BTreeSet::new(),
            retry_policy: RetryPolicy::default(),
            queue_hint: None,
        }
    }
}

/// Queue category + provider consulted by `enqueue` (§4.6), outranking the
/// bridge-default queue category when set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerHint {
    pub queue_category: String,
    pub provider: Option<String>,
}

/// Where to route a run's start/finish notifications (§4.9).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationHint {
    pub adapter_key: String,
    pub channel: String,
    pub title_template: String,
}

/// A workflow's full DAG plus optional scheduler/notification hints (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    pub nodes: IndexMap<String, NodeDefinition>,
    pub version: Option<String>,
    pub scheduler: Option<SchedulerHint>,
    pub notifications: Option<NotificationHint>,
}

impl WorkflowDefinition {
    pub fn new(nodes: IndexMap<String, NodeDefinition>) -> Self {
        Self { nodes, version: None, scheduler: None, notifications: None }
    }
}
