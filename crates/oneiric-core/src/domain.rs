// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! The five domains a candidate can be registered under.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A domain the resolver selects candidates within.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Adapter,
    Service,
    Task,
    Event,
    Workflow,
}

impl Domain {
    pub const ALL: [Domain; 5] =
        [Domain::Adapter, Domain::Service, Domain::Task, Domain::Event, Domain::Workflow];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Adapter => "adapter",
            Domain::Service => "service",
            Domain::Task => "task",
            Domain::Event => "event",
            Domain::Workflow => "workflow",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Domain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "adapter" => Ok(Domain::Adapter),
            "service" => Ok(Domain::Service),
            "task" => Ok(Domain::Task),
            "event" => Ok(Domain::Event),
            "workflow" => Ok(Domain::Workflow),
            other => Err(format!("unknown domain: {other}")),
        }
    }
}
