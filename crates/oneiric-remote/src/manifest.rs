// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! Remote manifest schema (§4.7, §6 "Remote manifest byte layout"): an
//! envelope of entries, each convertible into a [`Candidate`] with
//! `source = remote`. Schema version 1 is accepted on read; version 2 adds
//! nothing this loader requires beyond the field itself (Open Question,
//! see DESIGN.md).

use oneiric_core::{Capabilities, CandidateMetadata, Domain};
use serde::{Deserialize, Serialize};
use serde_json::Value;

fn default_schema_version() -> u32 {
    1
}

/// One entry's downloadable artifact (§4.7 step 5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactRef {
    pub uri: String,
    pub sha256: String,
    #[serde(default = "default_entry_path")]
    pub entry_path: String,
}

fn default_entry_path() -> String {
    "payload.bin".to_string()
}

/// A single candidate offer as carried over the wire. `factory` names a
/// builder already linked into this binary — manifests describe data, not
/// executable code, so ingest resolves `factory` through a local
/// [`crate::factory_registry::FactoryRegistry`] rather than deserializing
/// behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub domain: Domain,
    pub key: String,
    pub provider: String,
    pub factory: String,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub stack_level: i32,
    #[serde(default)]
    pub capabilities: Capabilities,
    #[serde(default)]
    pub metadata: CandidateMetadata,
    /// Free-form settings forwarded to the factory; unknown fields are
    /// preserved but ignored by anything that doesn't read them (§4.7 step 4).
    #[serde(default)]
    pub settings: Value,
    pub artifact: Option<ArtifactRef>,
}

/// The signed payload: an ordered list of entries plus publication facts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEnvelope {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub entries: Vec<ManifestEntry>,
    pub published_at: u64,
    pub signer_id: String,
}

impl ManifestEnvelope {
    /// Schema validation (§4.7 step 4): every entry must name a domain, key,
    /// provider, and factory. Unknown JSON fields already round-tripped
    /// through `serde`'s `Value`-typed slots; this only rejects entries
    /// missing the required identity.
    pub fn validate(&self) -> Result<(), String> {
        for (index, entry) in self.entries.iter().enumerate() {
            if entry.key.trim().is_empty() {
                return Err(format!("entry {index}: key must not be empty"));
            }
            if entry.provider.trim().is_empty() {
                return Err(format!("entry {index}: provider must not be empty"));
            }
            if entry.factory.trim().is_empty() {
                return Err(format!("entry {index}: factory must not be empty"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
