// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! The error taxonomy shared across every crate (§7).
//!
//! Each crate defines its own narrower error enum for its operations; those
//! enums convert into [`OneiricError`] at the boundary the CLI sits behind,
//! so exit-code selection (§6) happens in exactly one place.

use crate::domain::Domain;
use thiserror::Error;

/// Top-level error kind, matched by the CLI to select a process exit code.
#[derive(Debug, Error)]
pub enum OneiricError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("no candidate resolved for {domain}/{key}")]
    UnresolvedCandidate { domain: Domain, key: String },

    #[error("duplicate registration for {domain}/{key}/{provider} from a different source")]
    DuplicateRegistration { domain: Domain, key: String, provider: String },

    #[error("lifecycle {stage} failed for {domain}/{key}: {message}")]
    Lifecycle { domain: Domain, key: String, stage: LifecycleStage, message: String },

    #[error("swap rolled back for {domain}/{key}: pending candidate failed {stage}")]
    SwapRollback { domain: Domain, key: String, stage: LifecycleStage },

    #[error("manifest signature invalid: {0}")]
    SignatureInvalid(String),

    #[error("manifest digest mismatch: expected {expected}, got {actual}")]
    DigestMismatch { expected: String, actual: String },

    #[error("path traversal rejected: {0}")]
    PathTraversal(String),

    #[error("remote circuit open for source {0}, retry at epoch ms {1}")]
    CircuitOpen(String, u64),

    #[error("remote sync failed: {0}")]
    RemoteFetch(String),

    #[error("workflow {0} has a cycle among nodes: {1:?}")]
    CyclicWorkflow(String, Vec<String>),

    #[error("no queue adapter available for workflow {0}")]
    NoQueueAdapter(String),

    #[error("handler error: {0}")]
    Handler(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl OneiricError {
    /// Process exit code for this error kind (§6, §7).
    pub fn exit_code(&self) -> i32 {
        match self {
            OneiricError::Config(_) => 2,
            OneiricError::UnresolvedCandidate { .. } => 2,
            OneiricError::DuplicateRegistration { .. } => 2,
            OneiricError::SignatureInvalid(_)
            | OneiricError::DigestMismatch { .. }
            | OneiricError::PathTraversal(_)
            | OneiricError::CircuitOpen(..)
            | OneiricError::RemoteFetch(_) => 3,
            OneiricError::Lifecycle { .. } | OneiricError::SwapRollback { .. } => 4,
            OneiricError::CyclicWorkflow(..) | OneiricError::NoQueueAdapter(_) => 5,
            OneiricError::Cancelled => 130,
            OneiricError::Handler(_) | OneiricError::Storage(_) | OneiricError::Io(_) | OneiricError::Serde(_) => 1,
        }
    }

    /// Stable variant name (§6's `last_error.kind`), independent of the
    /// human-readable `Display` message.
    pub fn kind_name(&self) -> &'static str {
        match self {
            OneiricError::Config(_) => "Config",
            OneiricError::UnresolvedCandidate { .. } => "UnresolvedCandidate",
            OneiricError::DuplicateRegistration { .. } => "DuplicateRegistration",
            OneiricError::Lifecycle { .. } => "Lifecycle",
            OneiricError::SwapRollback { .. } => "SwapRollback",
            OneiricError::SignatureInvalid(_) => "SignatureInvalid",
            OneiricError::DigestMismatch { .. } => "DigestMismatch",
            OneiricError::PathTraversal(_) => "PathTraversal",
            OneiricError::CircuitOpen(..) => "CircuitOpen",
            OneiricError::RemoteFetch(_) => "RemoteFetch",
            OneiricError::CyclicWorkflow(..) => "CyclicWorkflow",
            OneiricError::NoQueueAdapter(_) => "NoQueueAdapter",
            OneiricError::Handler(_) => "Handler",
            OneiricError::Storage(_) => "Storage",
            OneiricError::Cancelled => "Cancelled",
            OneiricError::Io(_) => "Io",
            OneiricError::Serde(_) => "Serde",
        }
    }
}

/// Which lifecycle hook failed, carried by [`OneiricError::Lifecycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleStage {
    Init,
    Health,
    Cleanup,
}

impl std::fmt::Display for LifecycleStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LifecycleStage::Init => "init",
            LifecycleStage::Health => "health",
            LifecycleStage::Cleanup => "cleanup",
        };
        write!(f, "{s}")
    }
}
