// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! Activity store (§4.4): operator-declared pause/drain intent per slot.

use oneiric_core::{ActivityState, Domain};
use std::collections::HashMap;

type SlotKey = (Domain, String);

/// Maps `(domain,key) -> {paused, draining, note}`. Distinct from the
/// Lifecycle Manager's own `paused`/`draining` flags: this is the
/// operator's *declared intent*, which the Supervisor reconciles against
/// actual lifecycle state on its next tick (§4.4).
#[derive(Default)]
pub struct ActivityStore {
    states: parking_lot::RwLock<HashMap<SlotKey, ActivityState>>,
}

impl ActivityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_paused(&self, domain: Domain, key: &str, paused: bool, note: Option<String>) {
        let mut states = self.states.write();
        let entry = states.entry((domain, key.to_string())).or_default();
        entry.paused = paused;
        if note.is_some() {
            entry.note = note;
        }
    }

    pub fn set_draining(&self, domain: Domain, key: &str, draining: bool, note: Option<String>) {
        let mut states = self.states.write();
        let entry = states.entry((domain, key.to_string())).or_default();
        entry.draining = draining;
        if note.is_some() {
            entry.note = note;
        }
    }

    pub fn get(&self, domain: Domain, key: &str) -> ActivityState {
        self.states.read().get(&(domain, key.to_string())).cloned().unwrap_or_default()
    }

    /// Every slot with a non-default declared intent, for the Supervisor
    /// tick and the telemetry writer.
    pub fn pending(&self) -> Vec<(SlotKey, ActivityState)> {
        self.states
            .read()
            .iter()
            .filter(|(_, state)| state.paused || state.draining)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
