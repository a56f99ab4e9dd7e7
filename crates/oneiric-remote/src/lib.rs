// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! The Remote Manifest Loader (§4.7): fetch, verify, ingest, hot-swap.

pub mod circuit;
pub mod digest;
pub mod factory_registry;
pub mod loader;
pub mod manifest;
pub mod source;
pub mod telemetry;
pub mod verify;

pub use circuit::CircuitBreaker;
pub use factory_registry::{FactoryBinding, FactoryRegistry};
pub use loader::RemoteLoader;
pub use manifest::{ArtifactRef, ManifestEntry, ManifestEnvelope};
pub use source::{HttpManifestSource, LocalManifestSource, ManifestSource};
pub use telemetry::{NullTelemetrySink, RemoteSyncError, RemoteSyncResult, TelemetrySink};
