// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! The per-(domain,key) lifecycle state machine (§4.3) and its snapshot types.

use crate::candidate::CandidateId;
use serde::{Deserialize, Serialize};

/// States a bound (domain,key) slot moves through.
///
/// ```text
/// Uninitialized -> Activating -> Ready -> (Running)
///                      |
///                 init failure
///                      v
///                   Failed
/// ```
/// Health going false once moves `Ready`/`Running` to `Degraded`; two
/// consecutive falses move it to `Failed`. `Paused`/`Draining` are entered
/// from `Ready` via the Activity/Supervisor and return to `Ready` on resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Uninitialized,
    Activating,
    Ready,
    Running,
    Degraded,
    Paused,
    Draining,
    Failed,
}

impl LifecycleState {
    pub fn is_terminal_failure(&self) -> bool {
        matches!(self, LifecycleState::Failed)
    }

    pub fn is_serving(&self) -> bool {
        matches!(self, LifecycleState::Ready | LifecycleState::Running | LifecycleState::Degraded)
    }
}

/// Per-(domain,key) lifecycle record (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleEntry {
    pub state: LifecycleState,
    pub current_provider: Option<String>,
    pub pending_provider: Option<String>,
    pub last_health: Option<bool>,
    pub consecutive_health_failures: u32,
    pub paused: bool,
    pub draining: bool,
    pub note: Option<String>,
    pub last_error: Option<String>,
    pub attempts: u32,
}

impl Default for LifecycleEntry {
    fn default() -> Self {
        Self {
            state: LifecycleState::Uninitialized,
            current_provider: None,
            pending_provider: None,
            last_health: None,
            consecutive_health_failures: 0,
            paused: false,
            draining: false,
            note: None,
            last_error: None,
            attempts: 0,
        }
    }
}

impl LifecycleEntry {
    pub fn for_candidate(id: &CandidateId) -> Self {
        Self { current_provider: Some(id.provider.clone()), ..Self::default() }
    }
}
