// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! Carries a process exit code out of a command handler so `main()` is the
//! only place that calls `std::process::exit`.

use std::fmt;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

impl From<oneiric_core::OneiricError> for ExitError {
    fn from(error: oneiric_core::OneiricError) -> Self {
        Self { code: error.exit_code(), message: error.to_string() }
    }
}

impl From<oneiric_runtime::ConfigError> for ExitError {
    fn from(error: oneiric_runtime::ConfigError) -> Self {
        Self { code: 2, message: error.to_string() }
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}
