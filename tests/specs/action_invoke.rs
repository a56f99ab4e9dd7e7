// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

use crate::prelude::*;

#[test]
fn action_invoke_unregistered_task_is_unresolved_candidate() {
    Project::empty()
        .oneiric()
        .args(["action-invoke", "unregistered-task", "--payload", "{}"])
        .fails_with(2);
}

#[test]
fn action_invoke_rejects_malformed_payload() {
    Project::empty()
        .oneiric()
        .args(["action-invoke", "whatever", "--payload", "{not json"])
        .fails_with(2);
}

#[test]
fn event_emit_with_no_handlers_succeeds_with_empty_result() {
    Project::empty()
        .oneiric()
        .args(["event", "emit", "--topic", "demo.user.created", "--payload", "{}"])
        .passes()
        .stdout_has("no handlers matched this topic");
}
