// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! The Candidate Registry (§4.1): an in-memory store of provider candidates
//! keyed by `(domain, key, provider)`.

use oneiric_core::{Candidate, CandidateDescriptor, Domain, OneiricError, RegistrationToken, Source};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

type SlotKey = (Domain, String);

struct Entry {
    token: RegistrationToken,
    candidate: Candidate,
}

/// Insert/remove notification delivered synchronously inside the mutating
/// call, so observers never see a half-applied mutation (§4.1 invariant).
#[derive(Debug, Clone)]
pub enum RegistryEvent {
    Inserted { domain: Domain, key: String, provider: String, source: Source },
    Removed { domain: Domain, key: String, provider: String, source: Source },
}

type Subscriber = Arc<dyn Fn(&RegistryEvent) + Send + Sync>;

#[derive(Default)]
struct Inner {
    slots: HashMap<SlotKey, Vec<Entry>>,
    tokens: HashMap<RegistrationToken, SlotKey>,
    next_source_order: u64,
    subscribers: Vec<Subscriber>,
}

/// In-memory store of provider candidates. Single-writer/many-reader via
/// `parking_lot::RwLock`, the same pattern the reference daemon uses for its
/// materialized state.
#[derive(Default)]
pub struct CandidateRegistry {
    inner: RwLock<Inner>,
}

impl CandidateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a candidate. Re-registration of the same `(domain,key,provider,
    /// source)` replaces in place, preserving the prior `source_order`; a new
    /// tuple is assigned the next monotonic `source_order`.
    ///
    /// `strict`: reject registration with [`OneiricError::DuplicateRegistration`]
    /// if a *different* source already holds this `(domain,key,provider)`
    /// identity, instead of shadowing it.
    pub fn register(
        &self,
        mut candidate: Candidate,
        strict: bool,
    ) -> Result<RegistrationToken, OneiricError> {
        let slot_key = (candidate.id.domain, candidate.id.key.clone());
        let mut inner = self.inner.write();

        if let Some(entries) = inner.slots.get(&slot_key) {
            if let Some(existing) =
                entries.iter().find(|e| e.candidate.id.provider == candidate.id.provider)
            {
                if existing.candidate.source != candidate.source && strict {
                    return Err(OneiricError::DuplicateRegistration {
                        domain: candidate.id.domain,
                        key: candidate.id.key.clone(),
                        provider: candidate.id.provider.clone(),
                    });
                }
                if existing.candidate.source == candidate.source {
                    candidate.source_order = existing.candidate.source_order;
                }
            }
        }

        if candidate.source_order == 0 {
            inner.next_source_order += 1;
            candidate.source_order = inner.next_source_order;
        }

        let token = RegistrationToken::new();
        let event = RegistryEvent::Inserted {
            domain: candidate.id.domain,
            key: candidate.id.key.clone(),
            provider: candidate.id.provider.clone(),
            source: candidate.source,
        };

        let entries = inner.slots.entry(slot_key.clone()).or_default();
        entries.retain(|e| {
            !(e.candidate.id.provider == candidate.id.provider
                && e.candidate.source == candidate.source)
        });
        entries.push(Entry { token, candidate });
        inner.tokens.insert(token, slot_key);

        for sub in &inner.subscribers {
            sub(&event);
        }

        Ok(token)
    }

    /// Remove a previously-registered candidate.
    pub fn unregister(&self, token: RegistrationToken) -> Option<CandidateDescriptor> {
        let mut inner = self.inner.write();
        let slot_key = inner.tokens.remove(&token)?;
        let entries = inner.slots.get_mut(&slot_key)?;
        let pos = entries.iter().position(|e| e.token == token)?;
        let removed = entries.remove(pos);
        let descriptor = removed.candidate.descriptor();
        if entries.is_empty() {
            inner.slots.remove(&slot_key);
        }
        let event = RegistryEvent::Removed {
            domain: descriptor.id.domain,
            key: descriptor.id.key.clone(),
            provider: descriptor.id.provider.clone(),
            source: descriptor.source,
        };
        for sub in &inner.subscribers {
            sub(&event);
        }
        Some(descriptor)
    }

    /// Remove every candidate from a given `source` whose `(key, provider)`
    /// is not in `keep` — used by the remote loader to retire manifest
    /// entries absent from a re-published manifest (§4.7 step 6, P6).
    pub fn retire_source_except(
        &self,
        domain: Domain,
        source: Source,
        keep: &std::collections::HashSet<(String, String)>,
    ) -> Vec<CandidateDescriptor> {
        let tokens: Vec<RegistrationToken> = {
            let inner = self.inner.read();
            inner
                .slots
                .iter()
                .filter(|((d, _), _)| *d == domain)
                .flat_map(|(_, entries)| entries.iter())
                .filter(|e| {
                    e.candidate.source == source
                        && !keep.contains(&(e.candidate.id.key.clone(), e.candidate.id.provider.clone()))
                })
                .map(|e| e.token)
                .collect()
        };
        tokens.into_iter().filter_map(|t| self.unregister(t)).collect()
    }

    /// All candidates (active and shadowed) for a domain, optionally scoped
    /// to one key. Precedence classification happens in `oneiric-registry`'s
    /// `Resolver`, which is the component the domain bridges' `list`/
    /// `shadowed`/`explain` verbs actually proxy to (§4.5) — this method is
    /// the raw accessor beneath it.
    pub fn list_raw(&self, domain: Domain, key: Option<&str>) -> Vec<CandidateDescriptor> {
        let inner = self.inner.read();
        inner
            .slots
            .iter()
            .filter(|((d, k), _)| *d == domain && key.map(|want| want == k).unwrap_or(true))
            .flat_map(|(_, entries)| entries.iter())
            .map(|e| e.candidate.descriptor())
            .collect()
    }

    /// Subscribe to insert/remove notifications.
    pub fn subscribe(&self, callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
        self.inner.write().subscribers.push(Arc::new(callback));
    }

    /// Look up one candidate by identity, for the Lifecycle Manager's
    /// `activate`/`swap` to fetch the factory/hooks of the resolved winner.
    pub fn get(&self, domain: Domain, key: &str, provider: &str) -> Option<CandidateSnapshot> {
        let inner = self.inner.read();
        inner.slots.get(&(domain, key.to_string())).and_then(|entries| {
            entries.iter().find(|e| e.candidate.id.provider == provider).map(|e| CandidateSnapshot {
                factory: e.candidate.factory.clone(),
                hooks: e.candidate.hooks.clone(),
                capabilities: e.candidate.capabilities,
                descriptor: e.candidate.descriptor(),
            })
        })
    }
}

/// The behavioral parts of a candidate, fetched by identity once the
/// resolver has picked a winner.
pub struct CandidateSnapshot {
    pub factory: Arc<dyn oneiric_core::Factory>,
    pub hooks: Arc<dyn oneiric_core::LifecycleHooks>,
    pub capabilities: oneiric_core::Capabilities,
    pub descriptor: CandidateDescriptor,
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
