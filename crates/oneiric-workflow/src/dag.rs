// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! Kahn's-algorithm DAG compilation (§4.6): a [`WorkflowDefinition`] becomes
//! an ordered list of layers, each a set of nodes with no remaining
//! incoming edges once the prior layers are considered done.

use crate::definition::WorkflowDefinition;
use oneiric_core::OneiricError;
use std::collections::{HashMap, HashSet, VecDeque};

/// Compile a workflow's `depends_on` edges into topological layers.
/// Nodes within a layer carry no ordering constraint between each other and
/// may run concurrently. Fails with `CyclicWorkflow` carrying the nodes that
/// never reached zero in-degree.
pub fn compile(workflow_key: &str, definition: &WorkflowDefinition) -> Result<Vec<Vec<String>>, OneiricError> {
    let mut in_degree: HashMap<&str, usize> = HashMap::new();
    let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();

    for (node_key, node) in &definition.nodes {
        in_degree.entry(node_key.as_str()).or_insert(0);
        for dep in &node.depends_on {
            *in_degree.entry(node_key.as_str()).or_insert(0) += 1;
            dependents.entry(dep.as_str()).or_default().push(node_key.as_str());
        }
    }

    let mut remaining: HashSet<&str> = in_degree.keys().copied().collect();
    let mut frontier: VecDeque<&str> =
        in_degree.iter().filter(|(_, degree)| **degree == 0).map(|(key, _)| *key).collect();
    frontier.make_contiguous().sort_unstable();

    let mut layers = Vec::new();
    while !frontier.is_empty() {
        let mut layer: Vec<&str> = frontier.drain(..).collect();
        layer.sort_unstable();
        for node in &layer {
            remaining.remove(node);
        }

        let mut next_frontier = Vec::new();
        for node in &layer {
            if let Some(children) = dependents.get(node) {
                for child in children {
                    if let Some(degree) = in_degree.get_mut(child) {
                        *degree -= 1;
                        if *degree == 0 {
                            next_frontier.push(*child);
                        }
                    }
                }
            }
        }
        next_frontier.sort_unstable();
        frontier.extend(next_frontier);
        layers.push(layer.into_iter().map(str::to_string).collect());
    }

    if !remaining.is_empty() {
        let mut unresolved: Vec<String> = remaining.into_iter().map(str::to_string).collect();
        unresolved.sort();
        return Err(OneiricError::CyclicWorkflow(workflow_key.to_string(), unresolved));
    }

    Ok(layers)
}

#[cfg(test)]
#[path = "dag_tests.rs"]
mod tests;
