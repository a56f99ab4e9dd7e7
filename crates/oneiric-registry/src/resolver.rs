// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! The Resolver (§4.2): applies the 4-tier precedence rule to pick exactly
//! one candidate per `(domain, key)`, with an auditable `explain` trace.

use crate::registry::CandidateRegistry;
use oneiric_core::{CandidateDescriptor, Domain, OneiricError};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Live, mutable resolver inputs: explicit overrides and the package
/// precedence order (§4.2 tiers 1 and 2).
#[derive(Debug, Clone, Default)]
pub struct ResolverConfig {
    /// `selections[(domain,key)] = provider` — tier 1.
    pub selections: HashMap<(Domain, String), String>,
    /// Ordered package ids, lowest to highest precedence — tier 2.
    pub stack_order: Vec<String>,
}

impl ResolverConfig {
    fn inferred_priority(&self, owner: Option<&str>) -> i32 {
        match owner.and_then(|o| self.stack_order.iter().position(|p| p == o)) {
            Some(index) => index as i32 + 1,
            None => 0,
        }
    }
}

/// Which tier produced a decision, for `explain` output (§4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Override,
    Priority,
    StackLevel,
    RegistrationOrder,
}

/// One step of an `explain` trace: which tier ran, who survived, and why.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ExplainStep {
    pub tier: Tier,
    pub considered: Vec<String>,
    pub survivors: Vec<String>,
    pub note: String,
}

/// Full audit trail for a single `(domain, key)` resolution (§4.2, P3).
#[derive(Debug, Clone, serde::Serialize)]
pub struct ExplainTrace {
    pub domain: Domain,
    pub key: String,
    pub steps: Vec<ExplainStep>,
    pub winner: Option<CandidateDescriptor>,
}

/// Picks exactly one candidate per `(domain, key)` (§4.2). Pure in-memory,
/// never suspends (§5).
pub struct Resolver {
    registry: Arc<CandidateRegistry>,
    config: RwLock<ResolverConfig>,
}

impl Resolver {
    pub fn new(registry: Arc<CandidateRegistry>) -> Self {
        Self { registry, config: RwLock::new(ResolverConfig::default()) }
    }

    pub fn set_config(&self, config: ResolverConfig) {
        *self.config.write() = config;
    }

    pub fn config(&self) -> ResolverConfig {
        self.config.read().clone()
    }

    /// Resolve `(domain, key)`, failing with `UnresolvedCandidate` if no
    /// candidate survives every tier.
    pub fn resolve(&self, domain: Domain, key: &str) -> Result<CandidateDescriptor, OneiricError> {
        self.resolve_excluding(domain, key, &HashSet::new())
    }

    /// Resolve, skipping candidates whose provider name is in `excluded`
    /// (the Lifecycle Manager uses this to skip `Failed` candidates without
    /// mutating the registry, §4.3).
    pub fn resolve_excluding(
        &self,
        domain: Domain,
        key: &str,
        excluded: &HashSet<String>,
    ) -> Result<CandidateDescriptor, OneiricError> {
        let trace = self.explain_internal(domain, key, excluded);
        trace
            .winner
            .ok_or_else(|| OneiricError::UnresolvedCandidate { domain, key: key.to_string() })
    }

    /// Soft lookup: never errors, returns `None` if nothing resolves.
    pub fn try_resolve(&self, domain: Domain, key: &str) -> Option<CandidateDescriptor> {
        self.resolve(domain, key).ok()
    }

    /// Full explanation trace (§4.2, P3: replaying it reproduces the winner).
    pub fn explain(&self, domain: Domain, key: &str) -> ExplainTrace {
        self.explain_internal(domain, key, &HashSet::new())
    }

    /// Raw candidate list for a domain (or one key), active and shadowed
    /// alike — the accessor `list`/`shadowed` bridge verbs proxy through
    /// (§4.5).
    pub fn registry_list(&self, domain: Domain, key: Option<&str>) -> Vec<CandidateDescriptor> {
        self.registry.list_raw(domain, key)
    }

    fn explain_internal(&self, domain: Domain, key: &str, excluded: &HashSet<String>) -> ExplainTrace {
        let config = self.config.read().clone();
        let all = self.registry.list_raw(domain, Some(key));
        let mut survivors: Vec<CandidateDescriptor> =
            all.into_iter().filter(|c| !excluded.contains(&c.id.provider)).collect();
        let mut steps = Vec::new();

        // Tier 1: explicit override.
        let considered: Vec<String> = survivors.iter().map(|c| c.id.provider.clone()).collect();
        if let Some(pinned) = config.selections.get(&(domain, key.to_string())) {
            let before = survivors.len();
            survivors.retain(|c| &c.id.provider == pinned);
            steps.push(ExplainStep {
                tier: Tier::Override,
                considered: considered.clone(),
                survivors: survivors.iter().map(|c| c.id.provider.clone()).collect(),
                note: if survivors.len() < before {
                    format!("pinned to provider={pinned}")
                } else {
                    "no override configured".to_string()
                },
            });
        } else {
            steps.push(ExplainStep {
                tier: Tier::Override,
                considered: considered.clone(),
                survivors: considered.clone(),
                note: "no override configured".to_string(),
            });
        }

        if survivors.len() > 1 {
            survivors = narrow_by_max(&survivors, &mut steps, Tier::Priority, |c| {
                if c.priority != 0 { c.priority } else { config.inferred_priority(c.metadata.owner.as_deref()) }
            });
        }

        if survivors.len() > 1 {
            survivors = narrow_by_max(&survivors, &mut steps, Tier::StackLevel, |c| c.stack_level);
        }

        if survivors.len() > 1 {
            survivors = narrow_by_max(&survivors, &mut steps, Tier::RegistrationOrder, |c| {
                c.source_order as i64 as i32
            });
        }

        // Deterministic final tiebreak (never ambiguous, P2): lexicographic
        // provider name. Only reached if two candidates are identical across
        // every tier, which P2 requires us to still resolve deterministically.
        survivors.sort_by(|a, b| a.id.provider.cmp(&b.id.provider));

        ExplainTrace { domain, key: key.to_string(), steps, winner: survivors.into_iter().next() }
    }
}

fn narrow_by_max(
    survivors: &[CandidateDescriptor],
    steps: &mut Vec<ExplainStep>,
    tier: Tier,
    score: impl Fn(&CandidateDescriptor) -> i32,
) -> Vec<CandidateDescriptor> {
    let considered: Vec<String> = survivors.iter().map(|c| c.id.provider.clone()).collect();
    let max = survivors.iter().map(&score).max().unwrap_or(0);
    let next: Vec<CandidateDescriptor> =
        survivors.iter().filter(|c| score(c) == max).cloned().collect();
    let note = if next.len() < survivors.len() {
        format!("max score {max}")
    } else {
        "tie, deferring to next tier".to_string()
    };
    steps.push(ExplainStep {
        tier,
        considered,
        survivors: next.iter().map(|c| c.id.provider.clone()).collect(),
        note,
    });
    next
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
