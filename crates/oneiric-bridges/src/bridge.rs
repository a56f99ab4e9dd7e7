// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! The generic Domain Bridge shape shared by adapter/service/task (§4.5):
//! `use`, `list`, `shadowed`, `explain`, all proxying to Resolver+Lifecycle.

use oneiric_core::{CandidateDescriptor, Domain, Handle, OneiricError};
use oneiric_lifecycle::LifecycleManager;
use oneiric_registry::{ExplainTrace, Resolver};
use std::sync::Arc;

/// Thin, non-owning wrapper over one domain's slice of the resolver and
/// lifecycle manager (§9 "bridges hold a non-owning reference to the
/// runtime"). Adapter, Service, and Task bridges are all this type scoped
/// to a different [`Domain`]; only Event and Workflow need their own shape.
#[derive(Clone)]
pub struct Bridge {
    domain: Domain,
    resolver: Arc<Resolver>,
    lifecycle: Arc<LifecycleManager>,
}

impl Bridge {
    pub fn new(domain: Domain, resolver: Arc<Resolver>, lifecycle: Arc<LifecycleManager>) -> Self {
        Self { domain, resolver, lifecycle }
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Resolve and activate `key`. If `provider` is given it overrides the
    /// resolver at tier 1 for this call (§4.5).
    pub async fn use_key(&self, key: &str, provider: Option<&str>) -> Result<Handle, OneiricError> {
        match provider {
            Some(provider) => self.lifecycle.activate_as(self.domain, key, provider).await,
            None => self.lifecycle.activate(self.domain, key).await,
        }
    }

    /// All candidates for this domain (or one key), active and shadowed.
    pub fn list(&self, key: Option<&str>) -> Vec<CandidateDescriptor> {
        self.resolver.registry_list(self.domain, key)
    }

    /// Candidates present for `key` but not the resolved winner.
    pub fn shadowed(&self, key: &str) -> Vec<CandidateDescriptor> {
        let winner = self.resolver.try_resolve(self.domain, key);
        self.resolver
            .registry_list(self.domain, Some(key))
            .into_iter()
            .filter(|c| Some(&c.id.provider) != winner.as_ref().map(|w| &w.id.provider))
            .collect()
    }

    /// Audit trail for how `key` resolved (§4.2).
    pub fn explain(&self, key: &str) -> ExplainTrace {
        self.resolver.explain(self.domain, key)
    }

    pub async fn pause(&self, key: &str) -> Result<(), OneiricError> {
        self.lifecycle.pause(self.domain, key).await
    }

    pub async fn resume(&self, key: &str) -> Result<(), OneiricError> {
        self.lifecycle.resume(self.domain, key).await
    }

    pub async fn status(&self, key: &str) -> oneiric_core::LifecycleEntry {
        self.lifecycle.status(self.domain, key).await
    }
}

#[cfg(test)]
#[path = "bridge_tests.rs"]
mod tests;
