// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

use crate::prelude::*;

#[test]
fn oneiric_help_shows_usage() {
    Project::empty().oneiric().arg("--help").passes().stdout_has("Usage:");
}

#[test]
fn oneiric_version_shows_version() {
    Project::empty().oneiric().arg("--version").passes().stdout_has("0.1");
}

#[test]
fn list_help_shows_subcommand_flags() {
    Project::empty().oneiric().args(["list", "--help"]).passes().stdout_has("--domain");
}
