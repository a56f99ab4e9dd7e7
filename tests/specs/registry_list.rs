// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! With no factories compiled in and no remote manifests configured, every
//! domain starts empty — these specs pin that baseline rather than any
//! resolver precedence behavior (covered at the `oneiric-registry` unit
//! level instead, since the CLI never exposes a raw "register" verb).

use crate::prelude::*;

#[test]
fn list_with_no_candidates_prints_empty_message() {
    Project::empty().oneiric().args(["list", "--domain", "adapter"]).passes().stdout_has("no candidates registered");
}

#[test]
fn list_json_with_no_candidates_is_an_empty_array() {
    let output = Project::empty().oneiric().args(["list", "--json"]).output().expect("run oneiric list");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let value: serde_json::Value = serde_json::from_str(stdout.trim()).expect("valid JSON");
    assert_eq!(value, serde_json::json!([]));
}

#[test]
fn status_with_no_bound_slots_prints_empty_message() {
    Project::empty()
        .oneiric()
        .args(["status", "--domain", "service"])
        .passes()
        .stdout_has("no bound slots for this domain");
}

#[test]
fn explain_with_no_candidates_reports_no_winner() {
    Project::empty()
        .oneiric()
        .args(["explain", "--domain", "adapter", "--key", "cache"])
        .passes()
        .stdout_has("winner: none");
}

#[test]
fn supervisor_info_defaults_to_default_profile() {
    Project::empty().oneiric().args(["supervisor-info"]).passes().stdout_has("profile=default");
}
