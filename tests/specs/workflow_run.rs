// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

use crate::prelude::*;

#[test]
fn workflow_run_missing_definition_exits_with_config_code() {
    Project::empty()
        .oneiric()
        .args(["workflow", "run", "nope", "--context", "{}"])
        .fails_with(2);
}

#[test]
fn workflow_run_invalid_context_json_exits_with_config_code() {
    Project::empty()
        .oneiric()
        .args(["workflow", "run", "nope", "--context", "not json"])
        .fails_with(2);
}

#[test]
fn workflow_enqueue_without_queue_category_fails_no_queue_adapter() {
    let project = Project::empty();
    project.file(
        "workflows/single_node.json",
        r#"{"nodes": {"only": {"task_key": "do-thing"}}}"#,
    );

    // No `scheduler` hint on the definition and no `--queue-category`
    // override: `enqueue` has nothing to resolve a queue adapter from,
    // exit code 5 per the workflow-failure bucket.
    project.oneiric().args(["workflow", "enqueue", "single_node"]).fails_with(5);
}

#[test]
fn print_dag_for_linear_workflow() {
    let project = Project::empty();
    project.file(
        "workflows/linear.json",
        r#"{"nodes": {
            "a": {"task_key": "a"},
            "b": {"task_key": "b", "depends_on": ["a"]}
        }}"#,
    );

    project
        .oneiric()
        .args(["orchestrate", "--print-dag", "--workflow", "linear"])
        .passes()
        .stdout_has("\"a\"")
        .stdout_has("\"b\"");
}

#[test]
fn print_dag_rejects_cyclic_workflow() {
    let project = Project::empty();
    project.file(
        "workflows/cyclic.json",
        r#"{"nodes": {
            "a": {"task_key": "a", "depends_on": ["b"]},
            "b": {"task_key": "b", "depends_on": ["a"]}
        }}"#,
    );

    project.oneiric().args(["orchestrate", "--print-dag", "--workflow", "cyclic"]).fails_with(5);
}
