// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! The Remote Manifest Loader (§4.7): fetch, verify, digest-compare,
//! validate, download artifacts, ingest as Candidates, hot-swap, report.
//! Single-flight per source — `sync_once` takes `&self` and holds no
//! internal lock beyond `last_digest`, since the caller (one watcher task
//! per source, §5) already guarantees only one sync runs at a time.

use crate::circuit::CircuitBreaker;
use crate::digest::sha256_hex;
use crate::factory_registry::FactoryRegistry;
use crate::manifest::ManifestEnvelope;
use crate::source::ManifestSource;
use crate::telemetry::{RemoteSyncError, RemoteSyncResult, TelemetrySink};
use crate::verify::verify_signature;
use ed25519_dalek::VerifyingKey;
use oneiric_core::{Candidate, CandidateId, Clock, Domain, OneiricError, Source, SystemClock};
use oneiric_lifecycle::LifecycleManager;
use oneiric_registry::CandidateRegistry;
use oneiric_storage::ArtifactCache;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

const BACKOFF_BASE: Duration = Duration::from_secs(1);
const BACKOFF_CAP: Duration = Duration::from_secs(30);

fn backoff_delay(attempt: u32) -> Duration {
    let scaled = BACKOFF_BASE.saturating_mul(1u32 << attempt.min(8));
    scaled.min(BACKOFF_CAP)
}

pub struct RemoteLoader<C: Clock = SystemClock> {
    source: Box<dyn ManifestSource>,
    trusted_keys: Vec<VerifyingKey>,
    registry: Arc<CandidateRegistry>,
    lifecycle: Arc<LifecycleManager>,
    factories: Arc<FactoryRegistry>,
    artifact_cache: Arc<ArtifactCache>,
    telemetry: Arc<dyn TelemetrySink>,
    circuit: CircuitBreaker,
    max_retries: u32,
    last_digest: Mutex<Option<String>>,
    clock: C,
}

impl RemoteLoader<SystemClock> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        source: Box<dyn ManifestSource>,
        trusted_keys: Vec<VerifyingKey>,
        registry: Arc<CandidateRegistry>,
        lifecycle: Arc<LifecycleManager>,
        factories: Arc<FactoryRegistry>,
        artifact_cache: Arc<ArtifactCache>,
        telemetry: Arc<dyn TelemetrySink>,
        max_retries: u32,
    ) -> Self {
        Self {
            source,
            trusted_keys,
            registry,
            lifecycle,
            factories,
            artifact_cache,
            telemetry,
            circuit: CircuitBreaker::new(5, Duration::from_secs(60)),
            max_retries,
            last_digest: Mutex::new(None),
            clock: SystemClock,
        }
    }
}

impl<C: Clock> RemoteLoader<C> {
    #[allow(clippy::too_many_arguments)]
    pub fn with_clock(
        source: Box<dyn ManifestSource>,
        trusted_keys: Vec<VerifyingKey>,
        registry: Arc<CandidateRegistry>,
        lifecycle: Arc<LifecycleManager>,
        factories: Arc<FactoryRegistry>,
        artifact_cache: Arc<ArtifactCache>,
        telemetry: Arc<dyn TelemetrySink>,
        max_retries: u32,
        clock: C,
    ) -> Self {
        Self {
            source,
            trusted_keys,
            registry,
            lifecycle,
            factories,
            artifact_cache,
            telemetry,
            circuit: CircuitBreaker::new(5, Duration::from_secs(60)),
            max_retries,
            last_digest: Mutex::new(None),
            clock,
        }
    }

    /// Run one full sync pass (§4.7 steps 1-8).
    pub async fn sync_once(&self) -> Result<RemoteSyncResult, OneiricError> {
        let source_name = self.source.name().to_string();

        if self.circuit.is_open() {
            let error = OneiricError::CircuitOpen(source_name.clone(), self.clock.epoch_ms());
            warn!(source = %source_name, "remote-refresh-circuit-open");
            return Err(error);
        }

        match self.try_sync(&source_name).await {
            Ok(result) => {
                self.circuit.record_success();
                let _ = self.telemetry.record_remote_sync(&result);
                Ok(result)
            }
            Err(error) => {
                if self.circuit.record_failure() {
                    warn!(source = %source_name, "remote-refresh-circuit-open");
                }
                let result = RemoteSyncResult {
                    source: source_name,
                    changed: false,
                    digest: self.last_digest.lock().clone().unwrap_or_default(),
                    entry_count: 0,
                    synced_at: self.clock.epoch_ms(),
                    last_error: Some(RemoteSyncError::from(&error)),
                };
                let _ = self.telemetry.record_remote_sync(&result);
                Err(error)
            }
        }
    }

    async fn try_sync(&self, source_name: &str) -> Result<RemoteSyncResult, OneiricError> {
        // Step 1: fetch, with exponential back-off up to max_retries.
        let mut last_error = None;
        let mut fetched = None;
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                tokio::time::sleep(backoff_delay(attempt - 1)).await;
            }
            match self.source.fetch().await {
                Ok(manifest) => {
                    fetched = Some(manifest);
                    break;
                }
                Err(error) => last_error = Some(error),
            }
        }
        let fetched = match fetched {
            Some(fetched) => fetched,
            None => return Err(last_error.unwrap_or_else(|| OneiricError::RemoteFetch("fetch exhausted retries".to_string()))),
        };

        // Step 2: verify signature.
        verify_signature(&fetched.envelope_bytes, &fetched.signature_bytes, &self.trusted_keys)?;

        // Step 3: digest-compare against the last *accepted* digest. Not
        // committed here — a failure in steps 4-6 below must leave this
        // unchanged so a retry of the same bytes re-attempts ingest instead
        // of short-circuiting as "unchanged".
        let digest = sha256_hex(&fetched.envelope_bytes);
        if self.last_digest.lock().as_deref() == Some(digest.as_str()) {
            info!(source = %source_name, "remote-sync-complete changed=false");
            return Ok(RemoteSyncResult {
                source: source_name.to_string(),
                changed: false,
                digest,
                entry_count: 0,
                synced_at: self.clock.epoch_ms(),
                last_error: None,
            });
        }

        // Step 4: validate schema.
        let envelope: ManifestEnvelope =
            serde_json::from_slice(&fetched.envelope_bytes).map_err(OneiricError::Serde)?;
        envelope.validate().map_err(OneiricError::Config)?;

        // Step 5: download declared artifacts.
        for entry in &envelope.entries {
            if let Some(artifact) = &entry.artifact {
                if !self.artifact_cache.contains(&artifact.sha256) {
                    let bytes = download_artifact(&artifact.uri).await?;
                    let actual = sha256_hex(&bytes);
                    if actual != artifact.sha256 {
                        return Err(OneiricError::DigestMismatch { expected: artifact.sha256.clone(), actual });
                    }
                    self.artifact_cache.store(&artifact.sha256, &artifact.entry_path, &bytes)?;
                }
            }
        }

        // Step 6: ingest as Candidates with source=remote, retiring entries
        // this source previously published but no longer carries.
        let mut keep: HashMap<Domain, HashSet<(String, String)>> = HashMap::new();
        for entry in &envelope.entries {
            let binding = self
                .factories
                .get(&entry.factory)
                .ok_or_else(|| OneiricError::Config(format!("unknown remote factory '{}'", entry.factory)))?;
            let candidate = Candidate {
                id: CandidateId { domain: entry.domain, key: entry.key.clone(), provider: entry.provider.clone() },
                priority: entry.priority,
                stack_level: entry.stack_level,
                source: Source::Remote,
                source_order: 0,
                capabilities: entry.capabilities,
                metadata: entry.metadata.clone(),
                factory: binding.factory,
                hooks: binding.hooks,
                registered_at: self.clock.epoch_ms(),
            };
            keep.entry(entry.domain).or_default().insert((entry.key.clone(), entry.provider.clone()));
            self.registry.register(candidate, false)?;
        }
        for (domain, keep_set) in &keep {
            self.registry.retire_source_except(*domain, Source::Remote, keep_set);
        }

        // Ingest succeeded: this digest is now the last-accepted one. Commit
        // only here, never at the step-3 compare, so a failed validate/
        // download/ingest leaves the previous digest in place for retry.
        *self.last_digest.lock() = Some(digest.clone());

        // Step 7: hot-swap any (domain,key) whose active candidate changed.
        let mut swapped = HashSet::new();
        for entry in &envelope.entries {
            let slot = (entry.domain, entry.key.clone());
            if swapped.insert(slot.clone()) {
                if let Err(error) = self.lifecycle.swap(entry.domain, &entry.key, false).await {
                    warn!(domain = %entry.domain, key = %entry.key, %error, "remote hot-swap failed, active candidate preserved");
                }
            }
        }

        info!(source = %source_name, entries = envelope.entries.len(), "remote-sync-complete changed=true");
        Ok(RemoteSyncResult {
            source: source_name.to_string(),
            changed: true,
            digest,
            entry_count: envelope.entries.len(),
            synced_at: self.clock.epoch_ms(),
            last_error: None,
        })
    }
}

async fn download_artifact(uri: &str) -> Result<Vec<u8>, OneiricError> {
    let response = reqwest::get(uri).await.map_err(|error| OneiricError::RemoteFetch(format!("downloading {uri} failed: {error}")))?;
    let bytes = response.bytes().await.map_err(|error| OneiricError::RemoteFetch(format!("reading {uri} body failed: {error}")))?;
    Ok(bytes.to_vec())
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
