// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! Shared scaffolding for the end-to-end CLI specs: an isolated
//! `ONEIRIC_STATE_DIR`/`ONEIRIC_CONFIG` per test and a fluent wrapper over
//! `assert_cmd::Command`.

use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

/// An isolated state directory pointed at by env vars no test shares with
/// another — `serial_test` still guards anything that also touches process
/// env vars directly.
pub struct Project {
    _dir: TempDir,
    state_dir: PathBuf,
    config_path: PathBuf,
}

impl Project {
    pub fn empty() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let state_dir = dir.path().join("state");
        let config_path = dir.path().join("config.toml");
        std::fs::create_dir_all(&state_dir).expect("create state dir");
        Self { _dir: dir, state_dir, config_path }
    }

    /// Write `contents` to `<state_dir>/<relative>`, creating parent dirs.
    pub fn file(&self, relative: &str, contents: &str) -> &Self {
        let path = self.state_dir.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(path, contents).expect("write fixture file");
        self
    }

    pub fn workflow_definitions_dir(&self) -> PathBuf {
        self.state_dir.join("workflows")
    }

    pub fn oneiric(&self) -> Command {
        let mut cmd = Command::cargo_bin("oneiric").expect("built oneiric binary");
        cmd.env("ONEIRIC_STATE_DIR", &self.state_dir);
        cmd.env("ONEIRIC_CONFIG", &self.config_path);
        cmd
    }
}

pub trait CommandExt {
    fn passes(&mut self) -> &mut Self;
    fn fails_with(&mut self, code: i32) -> &mut Self;
    fn stdout_has(&mut self, needle: &str) -> &mut Self;
}

impl CommandExt for Command {
    fn passes(&mut self) -> &mut Self {
        self.assert().success();
        self
    }

    fn fails_with(&mut self, code: i32) -> &mut Self {
        self.assert().code(code);
        self
    }

    fn stdout_has(&mut self, needle: &str) -> &mut Self {
        let output = self.output().expect("run command");
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains(needle), "expected stdout to contain {needle:?}, got: {stdout}");
        self
    }
}
