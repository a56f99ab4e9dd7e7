// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! Durable persistence for the runtime: workflow checkpoints (§4.6), the
//! readiness snapshot the Supervisor writes (§4.4), and downloaded remote
//! manifest artifacts (§4.7). Nothing here is referenced by its consumers
//! except through the traits they already define — the runtime aggregate
//! is the only crate that wires this one in.

pub mod artifact_cache;
pub mod atomic_json;
pub mod readiness;
pub mod sqlite_checkpoint;

pub use artifact_cache::ArtifactCache;
pub use atomic_json::write_atomic;
pub use readiness::FileReadinessSink;
pub use sqlite_checkpoint::SqliteCheckpointStore;
