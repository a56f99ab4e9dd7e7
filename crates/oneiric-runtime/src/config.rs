// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Oneiric Contributors

//! Typed config binding (§4.11): `ONEIRIC_CONFIG` names the file, a
//! `RuntimeConfig` tree (serde + `toml`) describes what's in it — the same
//! split the reference daemon's `state_dir()`/`Config::load()` pair draws
//! between "where" and "what", just with a parsed document on the "what"
//! side instead of fixed paths.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine a config directory (no XDG_CONFIG_HOME or HOME)")]
    NoConfigDir,

    #[error("reading config file {}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },

    #[error("parsing config file {}: {source}", path.display())]
    Parse { path: PathBuf, source: Box<toml::de::Error> },
}

/// Supervisor/watcher defaults (§6 `profile`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    #[default]
    Default,
    Serverless,
}

impl std::str::FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Profile::Default),
            "serverless" => Ok(Profile::Serverless),
            other => Err(format!("unknown profile: {other}")),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptersConfig {
    /// `adapters.selections.<category> = <provider>` — tier-1 overrides.
    pub selections: HashMap<String, String>,
    /// `adapters.provider_settings.<provider>` — forwarded to the factory.
    pub provider_settings: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowsOptionsConfig {
    pub queue_category: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowsConfig {
    pub options: WorkflowsOptionsConfig,
    /// Directory holding `<workflow_key>.json` definition files. Defaults to
    /// `<state_dir>/workflows`.
    pub definitions_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginsConfig {
    pub auto_load: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimePathsConfig {
    pub checkpoints: Option<PathBuf>,
    pub telemetry: Option<PathBuf>,
    pub remote_status: Option<PathBuf>,
    pub readiness: Option<PathBuf>,
    pub cache_root: Option<PathBuf>,
}

/// One entry of `remote.manifests` (§6): a manifest source plus its trust
/// material and refresh cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteManifestConfig {
    pub uri: String,
    /// Hex-encoded Ed25519 public keys trusted to sign this manifest.
    pub public_keys: Vec<String>,
    pub refresh_interval_ms: u64,
    #[serde(default)]
    pub max_retries: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub manifests: Vec<RemoteManifestConfig>,
}

/// The root typed config tree (§6, §4.11).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub profile: Profile,
    pub adapters: AdaptersConfig,
    pub workflows: WorkflowsConfig,
    pub plugins: PluginsConfig,
    pub runtime_paths: RuntimePathsConfig,
    pub remote: RemoteConfig,
    /// Ordered package ids for tier-2 precedence; `STACK_ORDER` overrides.
    pub stack_order: Vec<String>,
}

impl RuntimeConfig {
    /// Resolve the config file path (`ONEIRIC_CONFIG` env var, else
    /// `$XDG_CONFIG_HOME/oneiric/config.toml`, else
    /// `~/.config/oneiric/config.toml`) and bind it. A missing file yields
    /// the all-defaults config rather than an error — absence of a config
    /// file is a valid "use the defaults" statement, not misconfiguration.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path()?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Self::parse(&contents, path),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Self::default_with_env()),
            Err(source) => Err(ConfigError::Read { path, source }),
        }
    }

    pub fn parse(contents: &str, path: PathBuf) -> Result<Self, ConfigError> {
        let mut config: RuntimeConfig =
            toml::from_str(contents).map_err(|source| ConfigError::Parse { path, source: Box::new(source) })?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn default_with_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    /// `STACK_ORDER` (comma-separated package ids) overrides `stack_order`
    /// when set (§6 environment variables).
    fn apply_env_overrides(&mut self) {
        if let Ok(order) = std::env::var("STACK_ORDER") {
            self.stack_order = order.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect();
        }
    }
}

fn config_path() -> Result<PathBuf, ConfigError> {
    if let Ok(path) = std::env::var("ONEIRIC_CONFIG") {
        return Ok(PathBuf::from(path));
    }
    let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(config_dir.join("oneiric").join("config.toml"))
}

/// Resolve the state directory runtime-persisted paths default under:
/// `ONEIRIC_STATE_DIR` > `XDG_STATE_HOME/oneiric` > `~/.local/state/oneiric`
/// — the same three-tier fallback the reference daemon's `state_dir()` uses
/// for `OJ_STATE_DIR`.
pub fn state_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(dir) = std::env::var("ONEIRIC_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("oneiric"));
    }
    let home = dirs::home_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(home.join(".local/state/oneiric"))
}

impl WorkflowsConfig {
    pub fn definitions_dir(&self, state_dir: &std::path::Path) -> PathBuf {
        self.definitions_dir.clone().unwrap_or_else(|| state_dir.join("workflows"))
    }
}

impl RuntimePathsConfig {
    pub fn checkpoints_path(&self, state_dir: &std::path::Path) -> PathBuf {
        self.checkpoints.clone().unwrap_or_else(|| state_dir.join("workflow_checkpoints.sqlite"))
    }

    pub fn telemetry_path(&self, state_dir: &std::path::Path) -> PathBuf {
        self.telemetry.clone().unwrap_or_else(|| state_dir.join("runtime_telemetry.json"))
    }

    pub fn remote_status_path(&self, state_dir: &std::path::Path) -> PathBuf {
        self.remote_status.clone().unwrap_or_else(|| state_dir.join("remote_status.json"))
    }

    pub fn readiness_path(&self, state_dir: &std::path::Path) -> PathBuf {
        self.readiness.clone().unwrap_or_else(|| state_dir.join("runtime_health.json"))
    }

    pub fn cache_root(&self, state_dir: &std::path::Path) -> PathBuf {
        self.cache_root.clone().unwrap_or_else(|| state_dir.to_path_buf())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
