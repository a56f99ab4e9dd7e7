// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! Spawns one watcher task per configured remote manifest source (§5: "one
//! Remote Loader per source"), each a periodic `sync_once` behind the same
//! cooperative `CancellationToken` shutdown pattern the Supervisor uses.

use crate::config::RemoteManifestConfig;
use ed25519_dalek::VerifyingKey;
use oneiric_core::OneiricError;
use oneiric_lifecycle::LifecycleManager;
use oneiric_registry::CandidateRegistry;
use oneiric_remote::{FactoryRegistry, HttpManifestSource, LocalManifestSource, ManifestSource, RemoteLoader, TelemetrySink};
use oneiric_storage::ArtifactCache;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::warn;

fn parse_verifying_key(hex_key: &str) -> Result<VerifyingKey, OneiricError> {
    let bytes = hex_decode(hex_key).map_err(|error| OneiricError::Config(format!("invalid public key '{hex_key}': {error}")))?;
    let array: [u8; 32] = bytes
        .try_into()
        .map_err(|_| OneiricError::Config(format!("public key '{hex_key}' is not 32 bytes")))?;
    VerifyingKey::from_bytes(&array).map_err(|error| OneiricError::Config(format!("invalid public key '{hex_key}': {error}")))
}

fn hex_decode(s: &str) -> Result<Vec<u8>, String> {
    if s.len() % 2 != 0 {
        return Err("odd-length hex string".to_string());
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).map_err(|e| e.to_string()))
        .collect()
}

fn source_for(uri: &str) -> Box<dyn ManifestSource> {
    if uri.starts_with("http://") || uri.starts_with("https://") {
        Box::new(HttpManifestSource::new(uri))
    } else {
        Box::new(LocalManifestSource::new(uri))
    }
}

/// Build and spawn a `RemoteLoader` watcher for each configured source,
/// returning their join handles so the caller can drain them on shutdown.
#[allow(clippy::too_many_arguments)]
pub fn spawn_watchers(
    manifests: &[RemoteManifestConfig],
    registry: Arc<CandidateRegistry>,
    lifecycle: Arc<LifecycleManager>,
    factories: Arc<FactoryRegistry>,
    artifact_cache: Arc<ArtifactCache>,
    telemetry: Arc<dyn TelemetrySink>,
    token: CancellationToken,
) -> Result<Vec<tokio::task::JoinHandle<()>>, OneiricError> {
    let mut handles = Vec::with_capacity(manifests.len());

    for config in manifests {
        let trusted_keys =
            config.public_keys.iter().map(|key| parse_verifying_key(key)).collect::<Result<Vec<_>, _>>()?;
        let loader = Arc::new(RemoteLoader::new(
            source_for(&config.uri),
            trusted_keys,
            registry.clone(),
            lifecycle.clone(),
            factories.clone(),
            artifact_cache.clone(),
            telemetry.clone(),
            config.max_retries,
        ));
        let interval = Duration::from_millis(config.refresh_interval_ms);
        let token = token.clone();
        let uri = config.uri.clone();

        handles.push(tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = tokio::time::sleep(interval) => {
                        if let Err(error) = loader.sync_once().await {
                            warn!(source = %uri, %error, "remote manifest sync failed");
                        }
                    }
                }
            }
        }));
    }

    Ok(handles)
}

#[cfg(test)]
#[path = "remote_watch_tests.rs"]
mod tests;
