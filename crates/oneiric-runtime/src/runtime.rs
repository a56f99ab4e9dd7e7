// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! The `Runtime` aggregate (§4.11 / "Root scheduler" in §5): owns the
//! registry, resolver, lifecycle manager, every domain bridge, the event
//! dispatcher, the workflow executor, the notification router, the
//! telemetry writer, and one watcher per configured remote source. This is
//! the single object `oneiric-cli`'s `orchestrate` command constructs and
//! tears down.

use crate::config::{Profile, RuntimeConfig};
use crate::notify::NotificationRouter;
use crate::remote_watch;
use crate::telemetry::TelemetryWriter;
use oneiric_bridges::{Bridge, EventDispatcher};
use oneiric_core::{Domain, OneiricError};
use oneiric_lifecycle::{ActivityStore, LifecycleManager, Supervisor};
use oneiric_registry::{CandidateRegistry, Resolver};
use oneiric_remote::{FactoryRegistry, TelemetrySink};
use oneiric_storage::{ArtifactCache, FileReadinessSink, SqliteCheckpointStore};
use oneiric_workflow::{CheckpointStore, WorkflowExecutor};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Supervisor tick interval per profile (§4.4's "profile & watcher
/// defaults"): `serverless` reconciles more eagerly since nothing else
/// keeps the process warm between invocations.
fn supervisor_interval(profile: Profile) -> Duration {
    match profile {
        Profile::Default => Duration::from_secs(30),
        Profile::Serverless => Duration::from_secs(5),
    }
}

pub struct Runtime {
    pub registry: Arc<CandidateRegistry>,
    pub resolver: Arc<Resolver>,
    pub lifecycle: Arc<LifecycleManager>,
    pub activity: Arc<ActivityStore>,
    pub adapter_bridge: Bridge,
    pub service_bridge: Bridge,
    pub task_bridge: Bridge,
    pub event_dispatcher: Arc<EventDispatcher>,
    pub workflow_executor: Arc<WorkflowExecutor>,
    pub checkpoints: Arc<dyn CheckpointStore>,
    pub notifications: NotificationRouter,
    pub telemetry: Arc<TelemetryWriter>,
    pub supervisor: Arc<Supervisor>,
    supervisor_handle: JoinHandle<()>,
    remote_watchers: Vec<JoinHandle<()>>,
    shutdown: CancellationToken,
}

impl Runtime {
    /// Wire every crate together from a bound [`RuntimeConfig`] (§4.11).
    /// `factories` is supplied by the embedder since only factories linked
    /// into this specific binary can ever be referenced by a remote
    /// manifest (§9 decision 12).
    pub async fn bootstrap(config: RuntimeConfig, factories: Arc<FactoryRegistry>) -> Result<Self, OneiricError> {
        let state_dir = crate::config::state_dir().map_err(|e| OneiricError::Config(e.to_string()))?;

        let registry = Arc::new(CandidateRegistry::new());
        let resolver = Arc::new(Resolver::new(registry.clone()));
        let lifecycle = Arc::new(LifecycleManager::new(registry.clone(), resolver.clone()));
        let activity = Arc::new(ActivityStore::new());

        let adapter_bridge = Bridge::new(Domain::Adapter, resolver.clone(), lifecycle.clone());
        let service_bridge = Bridge::new(Domain::Service, resolver.clone(), lifecycle.clone());
        let task_bridge = Bridge::new(Domain::Task, resolver.clone(), lifecycle.clone());

        let event_dispatcher = Arc::new(EventDispatcher::new(registry.clone(), lifecycle.clone()));

        let checkpoints_path = config.runtime_paths.checkpoints_path(&state_dir);
        let checkpoints: Arc<dyn CheckpointStore> = Arc::new(SqliteCheckpointStore::open(&checkpoints_path)?);
        let workflow_executor = Arc::new(WorkflowExecutor::new(lifecycle.clone(), checkpoints.clone()));

        let notifications = NotificationRouter::new(adapter_bridge.clone());

        let telemetry_path = config.runtime_paths.telemetry_path(&state_dir);
        let remote_status_path = config.runtime_paths.remote_status_path(&state_dir);
        let telemetry = Arc::new(TelemetryWriter::new(telemetry_path, remote_status_path));

        let readiness_path = config.runtime_paths.readiness_path(&state_dir);
        let readiness_sink = Arc::new(FileReadinessSink::new(readiness_path));
        let profile_name = match config.profile {
            Profile::Default => "default",
            Profile::Serverless => "serverless",
        };
        let supervisor = Arc::new(Supervisor::new(
            activity.clone(),
            lifecycle.clone(),
            readiness_sink,
            profile_name,
            supervisor_interval(config.profile),
        ));
        supervisor.set_remote_enabled(!config.remote.manifests.is_empty());

        let shutdown = CancellationToken::new();
        let supervisor_handle = supervisor.clone().spawn(shutdown.clone());

        let artifact_cache = Arc::new(ArtifactCache::new(config.runtime_paths.cache_root(&state_dir)));
        let telemetry_sink: Arc<dyn TelemetrySink> = telemetry.clone();
        let remote_watchers = remote_watch::spawn_watchers(
            &config.remote.manifests,
            registry.clone(),
            lifecycle.clone(),
            factories,
            artifact_cache,
            telemetry_sink,
            shutdown.clone(),
        )?;

        Ok(Self {
            registry,
            resolver,
            lifecycle,
            activity,
            adapter_bridge,
            service_bridge,
            task_bridge,
            event_dispatcher,
            workflow_executor,
            checkpoints,
            notifications,
            telemetry,
            supervisor,
            supervisor_handle,
            remote_watchers,
            shutdown,
        })
    }

    /// Cooperative shutdown (§5): cancel every long-running task and wait
    /// for them to drain.
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        let _ = self.supervisor_handle.await;
        for handle in self.remote_watchers {
            let _ = handle.await;
        }
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
