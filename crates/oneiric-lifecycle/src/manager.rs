// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! The Lifecycle Manager (§4.3): owns instantiation, health, swap, and
//! pause/drain for every `(domain, key)` slot.

use oneiric_core::{
    Capabilities, Domain, Handle, Instance, LifecycleEntry, LifecycleHooks, LifecycleStage,
    LifecycleState, OneiricError,
};
use oneiric_registry::{CandidateRegistry, CandidateSnapshot, Resolver};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{info, warn};

type SlotKey = (Domain, String);

/// Default `health()` budget before an `activate`/`swap` gives up (§4.3).
pub const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

struct ActiveInstance {
    descriptor: oneiric_core::CandidateDescriptor,
    instance: Instance,
    capabilities: Capabilities,
    hooks: Arc<dyn LifecycleHooks>,
}

#[derive(Default)]
struct Slot {
    entry: LifecycleEntry,
    current: Option<ActiveInstance>,
    /// Providers that failed `init`/`health` since the last `retry()`; the
    /// resolver is asked to skip them (§4.3 "resolver skips Failed
    /// candidates for activate until re-registered or retry() is issued").
    failed_providers: HashSet<String>,
}

/// A slot's async state plus the two pieces a `probe` must read without
/// waiting on the slot lock (§4.3 "never parallelizes a probe").
struct SlotHandle {
    inner: AsyncMutex<Slot>,
    last_health: parking_lot::Mutex<Option<bool>>,
    probing: AtomicBool,
}

impl Default for SlotHandle {
    fn default() -> Self {
        Self {
            inner: AsyncMutex::new(Slot::default()),
            last_health: parking_lot::Mutex::new(None),
            probing: AtomicBool::new(false),
        }
    }
}

/// Owns per-`(domain,key)` instantiation and state transitions.
///
/// Each slot gets its own `tokio::sync::Mutex`, so a slow `init`/`health` on
/// one key never blocks reads or writes on another — the same per-key
/// independence the reference daemon's materialized-state lock gives its
/// job records, just scoped to the async boundary lifecycle hooks require.
pub struct LifecycleManager {
    registry: Arc<CandidateRegistry>,
    resolver: Arc<Resolver>,
    slots: parking_lot::RwLock<HashMap<SlotKey, Arc<SlotHandle>>>,
    health_timeout: Duration,
}

impl LifecycleManager {
    pub fn new(registry: Arc<CandidateRegistry>, resolver: Arc<Resolver>) -> Self {
        Self {
            registry,
            resolver,
            slots: parking_lot::RwLock::new(HashMap::new()),
            health_timeout: DEFAULT_HEALTH_TIMEOUT,
        }
    }

    pub fn with_health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = timeout;
        self
    }

    fn slot(&self, domain: Domain, key: &str) -> Arc<SlotHandle> {
        let slot_key = (domain, key.to_string());
        if let Some(existing) = self.slots.read().get(&slot_key) {
            return existing.clone();
        }
        self.slots.write().entry(slot_key).or_insert_with(|| Arc::new(SlotHandle::default())).clone()
    }

    /// Resolve, instantiate, `init`, and `health`-check `(domain,key)`.
    /// Returns the cached `Handle` unchanged if the resolved winner matches
    /// the already-active candidate.
    pub async fn activate(&self, domain: Domain, key: &str) -> Result<Handle, OneiricError> {
        let slot = self.slot(domain, key);
        let mut guard = slot.inner.lock().await;

        let excluded = guard.failed_providers.clone();
        let winner = self.resolver.resolve_excluding(domain, key, &excluded)?;

        if let Some(active) = &guard.current {
            if active.descriptor.id.provider == winner.id.provider {
                return Ok(handle_from(guard.entry.state, active));
            }
        }

        let snapshot = self
            .registry
            .get(domain, key, &winner.id.provider)
            .ok_or(OneiricError::UnresolvedCandidate { domain, key: key.to_string() })?;

        guard.entry.state = LifecycleState::Activating;
        guard.entry.pending_provider = Some(winner.id.provider.clone());

        match self.bring_up(&snapshot).await {
            Ok(active) => {
                let handle = handle_from(LifecycleState::Ready, &active);
                guard.entry.state = LifecycleState::Ready;
                guard.entry.current_provider = Some(active.descriptor.id.provider.clone());
                guard.entry.pending_provider = None;
                guard.entry.last_error = None;
                guard.entry.consecutive_health_failures = 0;
                guard.current = Some(active);
                info!(%domain, %key, provider = %handle.candidate.id.provider, "activated");
                Ok(handle)
            }
            Err((stage, message)) => {
                guard.entry.state = LifecycleState::Failed;
                guard.entry.pending_provider = None;
                guard.entry.last_error = Some(message.clone());
                guard.failed_providers.insert(winner.id.provider.clone());
                Err(OneiricError::Lifecycle { domain, key: key.to_string(), stage, message })
            }
        }
    }

    /// Activate a specific `provider`, bypassing the resolver entirely
    /// (§4.5 `use(key, provider=Some(..))`: "overrides at tier 1 for this
    /// call"). Still goes through the same init/health contract as
    /// `activate`.
    pub async fn activate_as(&self, domain: Domain, key: &str, provider: &str) -> Result<Handle, OneiricError> {
        let slot = self.slot(domain, key);
        let mut guard = slot.inner.lock().await;

        if let Some(active) = &guard.current {
            if active.descriptor.id.provider == provider {
                return Ok(handle_from(guard.entry.state, active));
            }
        }

        let snapshot = self
            .registry
            .get(domain, key, provider)
            .ok_or(OneiricError::UnresolvedCandidate { domain, key: key.to_string() })?;

        guard.entry.state = LifecycleState::Activating;
        guard.entry.pending_provider = Some(provider.to_string());

        match self.bring_up(&snapshot).await {
            Ok(active) => {
                let handle = handle_from(LifecycleState::Ready, &active);
                guard.entry.state = LifecycleState::Ready;
                guard.entry.current_provider = Some(active.descriptor.id.provider.clone());
                guard.entry.pending_provider = None;
                guard.entry.last_error = None;
                guard.entry.consecutive_health_failures = 0;
                guard.current = Some(active);
                info!(%domain, %key, provider, "activated (pinned)");
                Ok(handle)
            }
            Err((stage, message)) => {
                guard.entry.state = LifecycleState::Failed;
                guard.entry.pending_provider = None;
                guard.entry.last_error = Some(message.clone());
                guard.failed_providers.insert(provider.to_string());
                Err(OneiricError::Lifecycle { domain, key: key.to_string(), stage, message })
            }
        }
    }

    /// Resolve again; if the winner differs from the active candidate,
    /// stand it up as `pending` and only on success swap it in atomically
    /// (§4.3 "Swap"). On failure the active candidate is left untouched
    /// unless `force` is set, in which case it is evicted and the slot moves
    /// to `Failed`.
    pub async fn swap(&self, domain: Domain, key: &str, force: bool) -> Result<Handle, OneiricError> {
        let slot = self.slot(domain, key);
        let mut guard = slot.inner.lock().await;

        let excluded = guard.failed_providers.clone();
        let winner = self.resolver.resolve_excluding(domain, key, &excluded)?;

        if let Some(active) = &guard.current {
            if active.descriptor.id.provider == winner.id.provider {
                return Ok(handle_from(guard.entry.state, active));
            }
        }

        let snapshot = self
            .registry
            .get(domain, key, &winner.id.provider)
            .ok_or(OneiricError::UnresolvedCandidate { domain, key: key.to_string() })?;

        guard.entry.pending_provider = Some(winner.id.provider.clone());

        match self.bring_up(&snapshot).await {
            Ok(new_active) => {
                let handle = handle_from(LifecycleState::Ready, &new_active);
                let displaced = guard.current.replace(new_active);
                guard.entry.state = LifecycleState::Ready;
                guard.entry.current_provider = Some(handle.candidate.id.provider.clone());
                guard.entry.pending_provider = None;
                guard.entry.last_error = None;
                // Cleanup runs after the swap is already committed: a
                // cleanup failure is logged but never masks the swap
                // (§4.3 "Failure semantics").
                if let Some(old) = displaced {
                    if old.capabilities.cleanup {
                        old.hooks.cleanup(&old.instance).await;
                    }
                }
                info!(%domain, %key, provider = %handle.candidate.id.provider, "swapped");
                Ok(handle)
            }
            Err((stage, message)) => {
                guard.entry.pending_provider = None;
                guard.entry.last_error = Some(message.clone());
                guard.failed_providers.insert(winner.id.provider.clone());
                if force {
                    let evicted = guard.current.take();
                    if let Some(old) = evicted {
                        if old.capabilities.cleanup {
                            old.hooks.cleanup(&old.instance).await;
                        }
                    }
                    guard.entry.state = LifecycleState::Failed;
                    guard.entry.current_provider = None;
                    warn!(%domain, %key, "forced swap evicted current candidate after pending failure");
                    Err(OneiricError::Lifecycle { domain, key: key.to_string(), stage, message })
                } else {
                    warn!(%domain, %key, "swap rolled back, current candidate kept");
                    Err(OneiricError::SwapRollback { domain, key: key.to_string(), stage })
                }
            }
        }
    }

    async fn bring_up(&self, snapshot: &CandidateSnapshot) -> Result<ActiveInstance, (LifecycleStage, String)> {
        let instance = snapshot.factory.build(serde_json::Value::Null).map_err(|e| (LifecycleStage::Init, e))?;

        if snapshot.capabilities.init {
            snapshot.hooks.init(&instance).await.map_err(|e| (LifecycleStage::Init, e))?;
        }

        if snapshot.capabilities.health {
            let healthy = tokio::time::timeout(self.health_timeout, snapshot.hooks.health(&instance))
                .await
                .map_err(|_| (LifecycleStage::Health, "health check timed out".to_string()))?
                .map_err(|e| (LifecycleStage::Health, e))?;
            if !healthy {
                return Err((LifecycleStage::Health, "health check returned false".to_string()));
            }
        }

        Ok(ActiveInstance {
            descriptor: snapshot.descriptor.clone(),
            instance,
            capabilities: snapshot.capabilities,
            hooks: snapshot.hooks.clone(),
        })
    }

    /// Cooperative pause: idempotent, invokes the `pause` hook if declared.
    pub async fn pause(&self, domain: Domain, key: &str) -> Result<(), OneiricError> {
        let slot = self.slot(domain, key);
        let mut guard = slot.inner.lock().await;
        if guard.entry.paused {
            return Ok(());
        }
        guard.entry.paused = true;
        if guard.entry.state.is_serving() {
            guard.entry.state = LifecycleState::Paused;
        }
        if let Some(active) = &guard.current {
            if active.capabilities.pause {
                active.hooks.pause(&active.instance).await;
            }
        }
        Ok(())
    }

    /// Cooperative resume: idempotent, invokes the `resume` hook if declared.
    pub async fn resume(&self, domain: Domain, key: &str) -> Result<(), OneiricError> {
        let slot = self.slot(domain, key);
        let mut guard = slot.inner.lock().await;
        if !guard.entry.paused {
            return Ok(());
        }
        guard.entry.paused = false;
        if guard.entry.state == LifecycleState::Paused {
            guard.entry.state = LifecycleState::Ready;
        }
        if let Some(active) = &guard.current {
            if active.capabilities.resume {
                active.hooks.resume(&active.instance).await;
            }
        }
        Ok(())
    }

    /// Like `pause` but waits for `attempts == 0` before returning; past
    /// `timeout` the slot moves to `Failed` and `cleanup` runs (§4.3).
    pub async fn drain(&self, domain: Domain, key: &str, timeout: Duration) -> Result<(), OneiricError> {
        let slot = self.slot(domain, key);
        {
            let mut guard = slot.inner.lock().await;
            guard.entry.draining = true;
            guard.entry.state = LifecycleState::Draining;
        }

        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            {
                let guard = slot.inner.lock().await;
                if guard.entry.attempts == 0 {
                    break;
                }
            }
            if tokio::time::Instant::now() >= deadline {
                let mut guard = slot.inner.lock().await;
                guard.entry.state = LifecycleState::Failed;
                guard.entry.draining = false;
                let displaced = guard.current.take();
                drop(guard);
                if let Some(old) = displaced {
                    if old.capabilities.cleanup {
                        old.hooks.cleanup(&old.instance).await;
                    }
                }
                return Err(OneiricError::Lifecycle {
                    domain,
                    key: key.to_string(),
                    stage: LifecycleStage::Cleanup,
                    message: "drain timed out waiting for outstanding operations".to_string(),
                });
            }
            tokio::time::sleep(Duration::from_millis(25)).await;
        }

        let mut guard = slot.inner.lock().await;
        guard.entry.draining = false;
        guard.entry.state = LifecycleState::Ready;
        Ok(())
    }

    /// Mark one outstanding call against `(domain,key)` so `drain` has
    /// something to wait on (§4.3). Paired with [`Self::end_operation`];
    /// callers that invoke a task/adapter/service instance directly (the
    /// task bridge's ad hoc invocations, a workflow node's task call) wrap
    /// the call between the two rather than going through a guard type,
    /// since the invocation is always a single `.await` with no early
    /// returns to miss.
    pub async fn begin_operation(&self, domain: Domain, key: &str) {
        let slot = self.slot(domain, key);
        slot.inner.lock().await.entry.attempts += 1;
    }

    /// Counterpart to [`Self::begin_operation`]; call once the invocation
    /// has returned, success or failure.
    pub async fn end_operation(&self, domain: Domain, key: &str) {
        let slot = self.slot(domain, key);
        let mut guard = slot.inner.lock().await;
        guard.entry.attempts = guard.entry.attempts.saturating_sub(1);
    }

    /// Run `health()` if declared, under a 1-inflight guard: a probe already
    /// running is never joined, the caller gets the last known value back
    /// instead (§4.3).
    pub async fn probe(&self, domain: Domain, key: &str) -> Result<bool, OneiricError> {
        let slot = self.slot(domain, key);
        if slot.probing.swap(true, Ordering::AcqRel) {
            return Ok(slot.last_health.lock().unwrap_or(false));
        }
        let result = self.probe_inner(domain, key, &slot).await;
        slot.probing.store(false, Ordering::Release);
        result
    }

    async fn probe_inner(&self, domain: Domain, key: &str, slot: &Arc<SlotHandle>) -> Result<bool, OneiricError> {
        let mut guard = slot.inner.lock().await;
        let Some(active) = &guard.current else {
            return Ok(false);
        };
        if !active.capabilities.health {
            *slot.last_health.lock() = Some(true);
            return Ok(true);
        }

        let instance = active.instance.clone();
        let hooks = active.hooks.clone();
        let healthy = match tokio::time::timeout(self.health_timeout, hooks.health(&instance)).await {
            Ok(Ok(healthy)) => healthy,
            Ok(Err(message)) => {
                return Err(OneiricError::Lifecycle {
                    domain,
                    key: key.to_string(),
                    stage: LifecycleStage::Health,
                    message,
                })
            }
            Err(_) => {
                return Err(OneiricError::Lifecycle {
                    domain,
                    key: key.to_string(),
                    stage: LifecycleStage::Health,
                    message: "probe timed out".to_string(),
                })
            }
        };

        *slot.last_health.lock() = Some(healthy);
        guard.entry.last_health = Some(healthy);
        if healthy {
            guard.entry.consecutive_health_failures = 0;
            if guard.entry.state == LifecycleState::Degraded {
                guard.entry.state = LifecycleState::Ready;
            }
        } else {
            guard.entry.consecutive_health_failures += 1;
            guard.entry.state = if guard.entry.consecutive_health_failures >= 2 {
                LifecycleState::Failed
            } else {
                LifecycleState::Degraded
            };
        }
        Ok(healthy)
    }

    /// Clear a slot's failed-candidate memory and, if it was `Failed`, move
    /// it back to `Uninitialized` so the next `activate` tries again.
    pub async fn retry(&self, domain: Domain, key: &str) -> Result<(), OneiricError> {
        let slot = self.slot(domain, key);
        let mut guard = slot.inner.lock().await;
        guard.failed_providers.clear();
        if guard.entry.state == LifecycleState::Failed {
            guard.entry.state = LifecycleState::Uninitialized;
        }
        guard.entry.last_error = None;
        Ok(())
    }

    /// Read-only view of one slot.
    pub async fn status(&self, domain: Domain, key: &str) -> LifecycleEntry {
        let slot = self.slot(domain, key);
        slot.inner.lock().await.entry.clone()
    }

    /// Read-only view of every known slot, for the telemetry writer (§4.4).
    pub async fn snapshot(&self) -> HashMap<(Domain, String), LifecycleEntry> {
        let slots: Vec<(SlotKey, Arc<SlotHandle>)> =
            self.slots.read().iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        let mut out = HashMap::with_capacity(slots.len());
        for (key, slot) in slots {
            let entry = slot.inner.lock().await.entry.clone();
            out.insert(key, entry);
        }
        out
    }
}

fn handle_from(state: LifecycleState, active: &ActiveInstance) -> Handle {
    Handle { candidate: active.descriptor.clone(), instance: active.instance.clone(), state }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
