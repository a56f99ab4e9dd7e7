// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! Maps a manifest entry's `factory` name to a locally-linked
//! [`Factory`]/[`LifecycleHooks`] pair. A manifest ships data, never code —
//! the set of factories a remote entry can reference is exactly the set
//! the operator compiled into this binary and registered here at startup.

use oneiric_core::{Factory, LifecycleHooks, NoHooks};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone)]
pub struct FactoryBinding {
    pub factory: Arc<dyn Factory>,
    pub hooks: Arc<dyn LifecycleHooks>,
}

impl FactoryBinding {
    pub fn new(factory: Arc<dyn Factory>) -> Self {
        Self { factory, hooks: Arc::new(NoHooks) }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn LifecycleHooks>) -> Self {
        self.hooks = hooks;
        self
    }
}

#[derive(Default)]
pub struct FactoryRegistry {
    bindings: HashMap<String, FactoryBinding>,
}

impl FactoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, binding: FactoryBinding) {
        self.bindings.insert(name.into(), binding);
    }

    pub fn get(&self, name: &str) -> Option<FactoryBinding> {
        self.bindings.get(name).cloned()
    }
}

#[cfg(test)]
#[path = "factory_registry_tests.rs"]
mod tests;
