// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! The Supervisor (§4.4): a periodic background task, enabled per-profile,
//! that reconciles declared activity intent against actual lifecycle state
//! and writes the readiness snapshot external probes read.

use crate::activity::ActivityStore;
use crate::manager::LifecycleManager;
use oneiric_core::LifecycleEntry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Readiness document written as `runtime_health.json` (§4.4, §6).
#[derive(Debug, Clone, serde::Serialize)]
pub struct ReadinessSnapshot {
    pub watchers_running: bool,
    pub remote_enabled: bool,
    pub profile: String,
    pub secrets_ok: bool,
    pub activity_state: HashMap<String, oneiric_core::ActivityState>,
    pub lifecycle_state: HashMap<String, LifecycleEntry>,
}

/// Sink the Supervisor writes its readiness snapshot through. Kept generic
/// so `oneiric-lifecycle` never depends on `oneiric-storage` directly — the
/// runtime aggregate wires the concrete atomic-JSON-writer implementation in
/// (§4.11's "bridges hold a non-owning reference" pattern, applied one
/// level up).
pub trait ReadinessSink: Send + Sync {
    fn write(&self, snapshot: &ReadinessSnapshot) -> Result<(), oneiric_core::OneiricError>;
}

/// Periodic reconciliation loop, spawned only when the active profile
/// enables it (e.g. `serverless`, §4.4).
pub struct Supervisor {
    activity: Arc<ActivityStore>,
    lifecycle: Arc<LifecycleManager>,
    sink: Arc<dyn ReadinessSink>,
    profile: String,
    remote_enabled: AtomicBool,
    secrets_ok: AtomicBool,
    interval: Duration,
}

impl Supervisor {
    pub fn new(
        activity: Arc<ActivityStore>,
        lifecycle: Arc<LifecycleManager>,
        sink: Arc<dyn ReadinessSink>,
        profile: impl Into<String>,
        interval: Duration,
    ) -> Self {
        Self {
            activity,
            lifecycle,
            sink,
            profile: profile.into(),
            remote_enabled: AtomicBool::new(false),
            secrets_ok: AtomicBool::new(true),
            interval,
        }
    }

    pub fn set_remote_enabled(&self, enabled: bool) {
        self.remote_enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn set_secrets_ok(&self, ok: bool) {
        self.secrets_ok.store(ok, Ordering::Relaxed);
    }

    /// Spawn the loop as a `tokio::task`, cancelled cooperatively through
    /// `token` (the engine-loop task-shutdown pattern, §5).
    pub fn spawn(self: Arc<Self>, token: CancellationToken) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = tokio::time::sleep(self.interval) => self.tick().await,
                }
            }
        })
    }

    /// One reconciliation pass: drive any slot whose declared intent the
    /// Lifecycle Manager hasn't caught up to yet, then write readiness.
    pub async fn tick(&self) {
        for ((domain, key), state) in self.activity.pending() {
            let status = self.lifecycle.status(domain, &key).await;
            if state.paused && !status.paused {
                if let Err(error) = self.lifecycle.pause(domain, &key).await {
                    warn!(%domain, %key, %error, "supervisor failed to apply declared pause");
                }
            }
            if state.draining && !status.draining {
                if let Err(error) = self.lifecycle.drain(domain, &key, Duration::from_secs(30)).await {
                    warn!(%domain, %key, %error, "supervisor failed to apply declared drain");
                }
            }
        }

        let snapshot = self.snapshot().await;
        if let Err(error) = self.sink.write(&snapshot) {
            warn!(%error, "failed to write readiness snapshot");
        } else {
            debug!("readiness snapshot written");
        }
    }

    async fn snapshot(&self) -> ReadinessSnapshot {
        let lifecycle_state = self
            .lifecycle
            .snapshot()
            .await
            .into_iter()
            .map(|((domain, key), entry)| (format!("{domain}/{key}"), entry))
            .collect();

        let activity_state = self
            .activity
            .pending()
            .into_iter()
            .map(|((domain, key), state)| (format!("{domain}/{key}"), state))
            .collect();

        ReadinessSnapshot {
            watchers_running: true,
            remote_enabled: self.remote_enabled.load(Ordering::Relaxed),
            profile: self.profile.clone(),
            secrets_ok: self.secrets_ok.load(Ordering::Relaxed),
            activity_state,
            lifecycle_state,
        }
    }
}
