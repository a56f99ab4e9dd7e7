// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

use oneiric_runtime::{Profile, Runtime};

use crate::exit_error::ExitError;
use crate::output::{format_or_json, OutputFormat};

#[derive(serde::Serialize)]
struct SupervisorInfo {
    profile: &'static str,
    pending_slots: usize,
}

/// `supervisor-info` — static facts about the running supervisor: its
/// profile and how many slots currently carry a declared pause/drain
/// intent the next tick hasn't caught up to.
pub async fn handle(runtime: &Runtime, profile: Profile, format: OutputFormat) -> Result<(), ExitError> {
    let info = SupervisorInfo {
        profile: match profile {
            Profile::Default => "default",
            Profile::Serverless => "serverless",
        },
        pending_slots: runtime.activity.pending().len(),
    };

    format_or_json(format, &info, || {
        println!("profile={} pending_slots={}", info.profile, info.pending_slots);
    })
    .map_err(|error| ExitError::new(1, error.to_string()))
}
