//! Configuration merge system
//!
//! Layers, lowest precedence first:
//! 1. Built-in defaults
//! 2. Config file (~/.config/jenkins-fingerprint/config.toml)
//! 3. `JENKINS_URL`, `JENKINS_USER`, `JENKINS_API_TOKEN`
//! 4. CLI flags

mod client;
mod defaults;
mod merge;

pub use client::{ClientConfig, ConfigError, ConfigOverrides, ENV_API_TOKEN, ENV_URL, ENV_USER};
pub use defaults::BuiltinDefaults;
pub use merge::{deep_merge, merge_layers};
