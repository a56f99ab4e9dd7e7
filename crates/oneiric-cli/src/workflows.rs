// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! Workflow definitions aren't registry candidates, so unlike adapters,
//! services, tasks, and events they have no resolver entry to look up by
//! key. The CLI instead reads `<definitions_dir>/<key>.json` — one file per
//! workflow, named after its key.

use oneiric_workflow::WorkflowDefinition;
use std::path::Path;

use crate::exit_error::ExitError;

pub fn load(definitions_dir: &Path, workflow_key: &str) -> Result<WorkflowDefinition, ExitError> {
    let path = definitions_dir.join(format!("{workflow_key}.json"));
    let contents = std::fs::read_to_string(&path).map_err(|source| {
        ExitError::new(2, format!("reading workflow definition {}: {source}", path.display()))
    })?;
    serde_json::from_str(&contents)
        .map_err(|source| ExitError::new(2, format!("parsing workflow definition {}: {source}", path.display())))
}
