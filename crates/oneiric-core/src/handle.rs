// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! [`Handle`]: the runtime-bound view returned to bridge callers (§3).

use crate::candidate::{CandidateDescriptor, Instance};
use crate::lifecycle_state::LifecycleState;

/// What a bridge hands back to a caller: the resolved candidate, the live
/// instance, and a read-only snapshot of its lifecycle state.
///
/// `instance` is a shared, non-owning reference (§3 "ownership"); the
/// Lifecycle Manager exclusively owns the instance's lifetime and may
/// `cleanup()` it during a swap after all outstanding handles are dropped.
#[derive(Clone)]
pub struct Handle {
    pub candidate: CandidateDescriptor,
    pub instance: Instance,
    pub state: LifecycleState,
}

impl Handle {
    /// Downcast the instance to the concrete trait object a bridge expects.
    pub fn downcast<T: Send + Sync + 'static>(&self) -> Option<std::sync::Arc<T>> {
        self.instance.clone().downcast::<T>().ok()
    }
}
