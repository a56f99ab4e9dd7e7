// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

use oneiric_core::{Domain, LifecycleEntry};
use oneiric_runtime::Runtime;
use std::collections::BTreeMap;
use std::io::Write;

use crate::exit_error::ExitError;
use crate::output::{handle_list, OutputFormat};

/// `status --domain D` — every bound slot's lifecycle entry within a domain.
pub async fn handle(runtime: &Runtime, domain: Domain, format: OutputFormat) -> Result<(), ExitError> {
    let entries: BTreeMap<String, LifecycleEntry> = runtime
        .lifecycle
        .snapshot()
        .await
        .into_iter()
        .filter(|((d, _), _)| *d == domain)
        .map(|((_, key), entry)| (key, entry))
        .collect();

    let rows: Vec<(String, LifecycleEntry)> = entries.into_iter().collect();
    handle_list(format, &rows, "no bound slots for this domain", |items, out| {
        for (key, entry) in items {
            let _ = writeln!(
                out,
                "{key}  state={:?} provider={} paused={} draining={}",
                entry.state,
                entry.current_provider.as_deref().unwrap_or("-"),
                entry.paused,
                entry.draining
            );
        }
    })
    .map_err(|error| ExitError::new(1, error.to_string()))
}
