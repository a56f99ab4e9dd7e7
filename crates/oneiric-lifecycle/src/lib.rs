// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! Lifecycle Manager and Activity/Supervisor (§4.3, §4.4): instantiation,
//! health, swap, and pause/drain for every registered slot.

pub mod activity;
pub mod manager;
pub mod supervisor;

pub use activity::ActivityStore;
pub use manager::{LifecycleManager, DEFAULT_HEALTH_TIMEOUT};
pub use supervisor::{ReadinessSink, ReadinessSnapshot, Supervisor};
