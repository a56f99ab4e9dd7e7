// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

use oneiric_core::Domain;
use oneiric_runtime::Runtime;

use crate::exit_error::ExitError;
use crate::output::{format_or_json, OutputFormat};

/// `explain --domain D --key K` — the resolver's audit trail for one slot.
pub async fn handle(runtime: &Runtime, domain: Domain, key: &str, format: OutputFormat) -> Result<(), ExitError> {
    let trace = runtime.resolver.explain(domain, key);
    format_or_json(format, &trace, || {
        println!("{domain}/{key}");
        for step in &trace.steps {
            println!(
                "  {:?}: considered={:?} survivors={:?} — {}",
                step.tier, step.considered, step.survivors, step.note
            );
        }
        match &trace.winner {
            Some(winner) => println!("winner: {}", winner.id),
            None => println!("winner: none"),
        }
    })
    .map_err(|error| ExitError::new(1, error.to_string()))
}
