// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! End-to-end specs driving the built `oneiric` binary (P1-P12 / S1-S6 from
//! the design doc are exercised here at the CLI boundary; unit-level
//! coverage for the same properties lives per-crate).

mod prelude;

#[path = "specs/cli_help.rs"]
mod cli_help;

#[path = "specs/registry_list.rs"]
mod registry_list;

#[path = "specs/workflow_run.rs"]
mod workflow_run;

#[path = "specs/action_invoke.rs"]
mod action_invoke;
