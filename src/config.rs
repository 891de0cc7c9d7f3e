//! # Dispatcher Configuration
//!
//! Behavioral switches for [`Dispatcher`](crate::dispatcher::Dispatcher),
//! loaded from environment variables or from a YAML file.
//!
//! ## Environment Variables
//!
//! ### `ROUTELET_NOT_FOUND_AFTER_HOOKS`
//!
//! When true, the synthesized `404 NOT FOUND` response for an unmatched
//! request is passed through the middleware `after` phase like any other
//! response. Default: `false` (misses skip after-hooks).
//!
//! ### `ROUTELET_RECOVER_FAULTS`
//!
//! When true, a handler that returns an error or panics is answered with
//! `500 INTERNAL SERVER ERROR` instead of failing the dispatch. Default:
//! `false` (handler faults propagate to the transport).
//!
//! Accepted values: `1`, `true`, `yes`, `on` and `0`, `false`, `no`, `off`
//! (case-insensitive). Anything else is ignored with a warning.
//!
//! ## YAML
//!
//! ```yaml
//! not_found_runs_after_hooks: true
//! recover_handler_faults: false
//! ```
//!
//! Missing keys keep their defaults.

use std::env;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use tracing::warn;

pub const ENV_NOT_FOUND_AFTER_HOOKS: &str = "ROUTELET_NOT_FOUND_AFTER_HOOKS";
pub const ENV_RECOVER_FAULTS: &str = "ROUTELET_RECOVER_FAULTS";

/// Dispatcher behavior switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatcherConfig {
    /// Run middleware after-hooks on synthesized not-found responses
    pub not_found_runs_after_hooks: bool,
    /// Convert handler errors and panics into `500` responses
    pub recover_handler_faults: bool,
}

impl DispatcherConfig {
    /// Load configuration from environment variables, starting from defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().merge_env()
    }

    /// Override fields with any environment variables that are set.
    #[must_use]
    pub fn merge_env(mut self) -> Self {
        if let Some(v) = env_flag(ENV_NOT_FOUND_AFTER_HOOKS) {
            self.not_found_runs_after_hooks = v;
        }
        if let Some(v) = env_flag(ENV_RECOVER_FAULTS) {
            self.recover_handler_faults = v;
        }
        self
    }

    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).context("Failed to parse dispatcher config")
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&raw).with_context(|| format!("Invalid config file {}", path.display()))
    }
}

fn env_flag(name: &str) -> Option<bool> {
    let raw = env::var(name).ok()?;
    let parsed = parse_flag(&raw);
    if parsed.is_none() {
        warn!(variable = name, value = %raw, "Ignoring unrecognized boolean value");
    }
    parsed
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
