// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

use oneiric_core::{CandidateDescriptor, Domain};
use oneiric_runtime::Runtime;
use std::io::Write;

use crate::exit_error::ExitError;
use crate::output::{handle_list, OutputFormat};

fn bridge_for<'a>(runtime: &'a Runtime, domain: Domain) -> Option<&'a oneiric_bridges::Bridge> {
    match domain {
        Domain::Adapter => Some(&runtime.adapter_bridge),
        Domain::Service => Some(&runtime.service_bridge),
        Domain::Task => Some(&runtime.task_bridge),
        Domain::Event | Domain::Workflow => None,
    }
}

/// `list [--domain D] [--shadowed]` — every candidate, or just the shadowed
/// ones, across one domain or all of them.
pub async fn handle(
    runtime: &Runtime,
    domain: Option<Domain>,
    shadowed: bool,
    format: OutputFormat,
) -> Result<(), ExitError> {
    let domains: Vec<Domain> = match domain {
        Some(d) => vec![d],
        None => Domain::ALL.to_vec(),
    };

    let mut candidates: Vec<CandidateDescriptor> = Vec::new();
    for d in domains {
        if shadowed {
            if let Some(bridge) = bridge_for(runtime, d) {
                for key in distinct_keys(&bridge.list(None)) {
                    candidates.extend(bridge.shadowed(&key));
                }
            }
        } else {
            candidates.extend(runtime.resolver.registry_list(d, None));
        }
    }

    handle_list(format, &candidates, "no candidates registered", |items, out| {
        for c in items {
            let _ = writeln!(
                out,
                "{}/{}/{}  priority={} stack_level={} source={}",
                c.id.domain, c.id.key, c.id.provider, c.priority, c.stack_level, c.source
            );
        }
    })
    .map_err(|error| ExitError::new(1, error.to_string()))
}

fn distinct_keys(candidates: &[CandidateDescriptor]) -> Vec<String> {
    let mut keys: Vec<String> = candidates.iter().map(|c| c.id.key.clone()).collect();
    keys.sort();
    keys.dedup();
    keys
}
