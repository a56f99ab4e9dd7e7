// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! Operator intent for a (domain,key) slot (§3, §4.4).

use serde::{Deserialize, Serialize};

/// Operator-declared intent that the Supervisor pushes into the
/// corresponding [`crate::lifecycle_state::LifecycleEntry`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityState {
    pub paused: bool,
    pub draining: bool,
    pub note: Option<String>,
}
