// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! Test builders shared across crates (enabled by the `test-support` feature).

use crate::candidate::{
    Candidate, CandidateId, CandidateMetadata, Capabilities, Instance, LifecycleHooks, NoHooks,
};
use crate::domain::Domain;
use crate::candidate::Source;
use std::sync::Arc;

/// A factory that always returns the same pre-built instance.
pub struct FixedFactory(pub Instance);

impl crate::candidate::Factory for FixedFactory {
    fn build(&self, _settings: serde_json::Value) -> Result<Instance, String> {
        Ok(self.0.clone())
    }
}

/// Minimal marker instance type for tests that don't care what's inside.
pub struct Marker(pub &'static str);

/// Build a bare-bones candidate for registry/resolver/lifecycle unit tests.
pub fn test_candidate(
    domain: Domain,
    key: &str,
    provider: &str,
    priority: i32,
    stack_level: i32,
    source: Source,
) -> Candidate {
    Candidate {
        id: CandidateId { domain, key: key.to_string(), provider: provider.to_string() },
        priority,
        stack_level,
        source,
        source_order: 0,
        capabilities: Capabilities::default(),
        metadata: CandidateMetadata::default(),
        factory: Arc::new(FixedFactory(Arc::new(Marker(provider)))),
        hooks: Arc::new(NoHooks),
        registered_at: 0,
    }
}

/// Attach custom hooks to a candidate built by [`test_candidate`].
pub fn with_hooks(mut candidate: Candidate, hooks: Arc<dyn LifecycleHooks>, caps: Capabilities) -> Candidate {
    candidate.hooks = hooks;
    candidate.capabilities = caps;
    candidate
}
