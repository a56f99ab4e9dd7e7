// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! The [`Candidate`] data model (§3): an offer to provide an implementation
//! for a `(domain, key, provider)` triple.

use crate::domain::Domain;
use async_trait::async_trait;
use std::any::Any;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Type-erased provider instance. Bridges downcast this to the concrete
/// trait they expect (e.g. a `CacheAdapter`) once resolved.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Where a candidate was discovered from (§3 invariants: re-registration
/// from the same source replaces; from a different source shadows).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    LocalPkg,
    EntryPoint,
    Remote,
    Manual,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Source::LocalPkg => "local_pkg",
            Source::EntryPoint => "entry_point",
            Source::Remote => "remote",
            Source::Manual => "manual",
        };
        write!(f, "{s}")
    }
}

/// Which lifecycle hooks a candidate declares (§9: "express each lifecycle
/// hook as a capability interface"). Bridges only invoke hooks the
/// candidate's metadata admits to implementing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Capabilities {
    pub init: bool,
    pub health: bool,
    pub cleanup: bool,
    pub pause: bool,
    pub resume: bool,
}

/// Identity of a candidate: the triple the registry keys on, plus `source`
/// which participates in uniqueness only for shadowing, not identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct CandidateId {
    pub domain: Domain,
    pub key: String,
    pub provider: String,
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.domain, self.key, self.provider)
    }
}

/// Capability-gated lifecycle hooks for a single candidate instance.
///
/// Default methods are no-ops; a factory implementation only overrides the
/// ones declared in its [`Capabilities`]. `health` defaults to `Ok(true)` so
/// a candidate without a health hook is always considered healthy.
#[async_trait]
pub trait LifecycleHooks: Send + Sync {
    async fn init(&self, _instance: &Instance) -> Result<(), String> {
        Ok(())
    }

    async fn health(&self, _instance: &Instance) -> Result<bool, String> {
        Ok(true)
    }

    async fn cleanup(&self, _instance: &Instance) {}

    async fn pause(&self, _instance: &Instance) {}

    async fn resume(&self, _instance: &Instance) {}
}

/// No-op hooks for candidates that declare no capabilities.
pub struct NoHooks;

#[async_trait]
impl LifecycleHooks for NoHooks {}

/// Opaque constructor: turns per-provider settings into a live [`Instance`].
pub trait Factory: Send + Sync {
    fn build(&self, settings: serde_json::Value) -> Result<Instance, String>;
}

/// Domain-specific extras (§3): event routing, workflow DAGs, scheduler
/// hints, notification routing. Stored untyped so the registry stays
/// domain-agnostic; bridges parse the slice relevant to their domain.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Extras(pub serde_json::Value);

impl Extras {
    pub fn empty() -> Self {
        Extras(serde_json::Value::Null)
    }

    pub fn get(&self, pointer: &str) -> Option<&serde_json::Value> {
        self.0.pointer(pointer)
    }
}

/// Capability-bag metadata carried by a candidate (§3).
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct CandidateMetadata {
    #[serde(default)]
    pub capability_set: BTreeSet<String>,
    pub version: Option<String>,
    pub owner: Option<String>,
    #[serde(default)]
    pub requires_secrets: Vec<String>,
    pub settings_model: Option<String>,
    /// **[ADDED]** free-text operator description, ignored by the resolver.
    pub description: Option<String>,
    #[serde(default)]
    pub extras: Extras,
}

/// An offer to provide an implementation for `(domain, key, provider)` (§3).
pub struct Candidate {
    pub id: CandidateId,
    pub priority: i32,
    pub stack_level: i32,
    pub source: Source,
    pub source_order: u64,
    pub capabilities: Capabilities,
    pub metadata: CandidateMetadata,
    pub factory: Arc<dyn Factory>,
    pub hooks: Arc<dyn LifecycleHooks>,
    /// **[ADDED]** epoch ms at registration time, for telemetry only — never
    /// used for precedence (§4.2 tier 4 uses `source_order`, not wall clock).
    pub registered_at: u64,
}

impl fmt::Debug for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Candidate")
            .field("id", &self.id)
            .field("priority", &self.priority)
            .field("stack_level", &self.stack_level)
            .field("source", &self.source)
            .field("source_order", &self.source_order)
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}

impl Candidate {
    /// A descriptor copy suitable for `list`/`explain` output — no factory,
    /// no hooks, nothing behavioral, just the facts an operator cares about.
    pub fn descriptor(&self) -> CandidateDescriptor {
        CandidateDescriptor {
            id: self.id.clone(),
            priority: self.priority,
            stack_level: self.stack_level,
            source: self.source,
            source_order: self.source_order,
            metadata: self.metadata.clone(),
        }
    }
}

/// Read-only, serializable view of a [`Candidate`] (no factory/hooks).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CandidateDescriptor {
    pub id: CandidateId,
    pub priority: i32,
    pub stack_level: i32,
    pub source: Source,
    pub source_order: u64,
    pub metadata: CandidateMetadata,
}
