// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! The Workflow DAG Engine (§4.6): compiles [`WorkflowDefinition`]s into
//! topological layers, executes them with checkpointed idempotent resume,
//! and resolves `enqueue` through the Adapter domain's queue candidates.

pub mod checkpoint;
pub mod dag;
pub mod definition;
pub mod enqueue;
pub mod executor;
pub mod record;

pub use checkpoint::{CheckpointStore, InMemoryCheckpointStore, NodeCheckpoint};
pub use dag::compile;
pub use definition::{NodeDefinition, NotificationHint, SchedulerHint, WorkflowDefinition};
pub use enqueue::enqueue;
pub use executor::WorkflowExecutor;
pub use record::{NodeRecord, NodeStatus, RunRecord, RunStatus};
