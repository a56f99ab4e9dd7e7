// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! The runtime aggregate (§4.11): typed config binding, the Notification
//! Router (§4.9), the merged Telemetry Writer (§4.10), per-source remote
//! watchers, and the `Runtime` struct that wires every other crate
//! together for `oneiric-cli`.

pub mod config;
pub mod notify;
pub mod remote_watch;
pub mod runtime;
pub mod telemetry;

pub use config::{ConfigError, Profile, RemoteManifestConfig, RuntimeConfig};
pub use notify::{NotificationMessage, NotificationRouter, NotifyRequest};
pub use runtime::Runtime;
pub use telemetry::{EventDispatchSummary, TelemetryWriter, WorkflowRunSummary};
