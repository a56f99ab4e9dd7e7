// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! Concrete [`ReadinessSink`] writing `runtime_health.json` atomically —
//! the implementation `oneiric-lifecycle`'s Supervisor is deliberately
//! decoupled from (§4.4, §4.11's "bridges hold a non-owning reference"
//! pattern, applied to the runtime aggregate).

use crate::atomic_json::write_atomic;
use oneiric_core::OneiricError;
use oneiric_lifecycle::{ReadinessSink, ReadinessSnapshot};
use std::path::PathBuf;

pub struct FileReadinessSink {
    path: PathBuf,
}

impl FileReadinessSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReadinessSink for FileReadinessSink {
    fn write(&self, snapshot: &ReadinessSnapshot) -> Result<(), OneiricError> {
        write_atomic(&self.path, snapshot)
    }
}

#[cfg(test)]
#[path = "readiness_tests.rs"]
mod tests;
