// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

use oneiric_core::{ActivityState, Domain};
use oneiric_runtime::Runtime;
use std::io::Write;

use crate::exit_error::ExitError;
use crate::output::{handle_list, OutputFormat};

/// `activity [--json]` — every slot with a non-default paused/drain intent.
pub async fn handle(runtime: &Runtime, format: OutputFormat) -> Result<(), ExitError> {
    let rows: Vec<(String, ActivityState)> = runtime
        .activity
        .pending()
        .into_iter()
        .map(|((domain, key), state): ((Domain, String), ActivityState)| (format!("{domain}/{key}"), state))
        .collect();

    handle_list(format, &rows, "no declared pause/drain intent", |items, out| {
        for (slot, state) in items {
            let _ = writeln!(
                out,
                "{slot}  paused={} draining={} note={}",
                state.paused,
                state.draining,
                state.note.as_deref().unwrap_or("-")
            );
        }
    })
    .map_err(|error| ExitError::new(1, error.to_string()))
}
