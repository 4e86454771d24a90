//! Client configuration
//!
//! Resolved from built-in defaults, an optional TOML file, `JENKINS_*`
//! environment variables and command-line flags, in that order.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::defaults::BuiltinDefaults;
use super::merge::merge_layers;

/// Environment variable for the server URL
pub const ENV_URL: &str = "JENKINS_URL";
/// Environment variable for the basic-auth user
pub const ENV_USER: &str = "JENKINS_USER";
/// Environment variable for the API token
pub const ENV_API_TOKEN: &str = "JENKINS_API_TOKEN";

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Shape(#[from] serde_json::Error),

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
}

/// Resolved client configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server root URL
    pub base_url: String,

    /// User for basic auth
    #[serde(default)]
    pub username: Option<String>,

    /// API token for basic auth
    #[serde(default)]
    pub api_token: Option<String>,

    /// Request timeout in seconds
    pub timeout_seconds: u64,

    /// Reject artifacts whose fingerprint the server does not track
    pub strict_validation: bool,

    /// Honour proxy environment variables
    pub use_system_proxy: bool,
}

/// One layer of optional settings (environment or command line)
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub username: Option<String>,
    pub api_token: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub strict_validation: Option<bool>,
}

impl ConfigOverrides {
    /// Read overrides from the process environment
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Read overrides through a variable lookup function
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.is_empty());
        Self {
            base_url: non_empty(ENV_URL),
            username: non_empty(ENV_USER),
            api_token: non_empty(ENV_API_TOKEN),
            ..Self::default()
        }
    }

    /// Convert to JSON Value for merging (unset fields are omitted)
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        if let Some(ref url) = self.base_url {
            map.insert("base_url".into(), Value::from(url.as_str()));
        }
        if let Some(ref user) = self.username {
            map.insert("username".into(), Value::from(user.as_str()));
        }
        if let Some(ref token) = self.api_token {
            map.insert("api_token".into(), Value::from(token.as_str()));
        }
        if let Some(timeout) = self.timeout_seconds {
            map.insert("timeout_seconds".into(), Value::from(timeout));
        }
        if let Some(strict) = self.strict_validation {
            map.insert("strict_validation".into(), Value::from(strict));
        }
        Value::Object(map)
    }
}

impl ClientConfig {
    /// Default config file path (~/.config/jenkins-fingerprint/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(".config/jenkins-fingerprint/config.toml"))
    }

    /// Resolve configuration from every layer.
    ///
    /// An explicit `path` must exist; the default path is used only if present.
    pub fn load(path: Option<&Path>, cli: &ConfigOverrides) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                Some(Self::load_toml_file(path)?)
            }
            None => match Self::default_path() {
                Some(default) if default.exists() => Some(Self::load_toml_file(&default)?),
                _ => None,
            },
        };

        Self::from_layers(file, &ConfigOverrides::from_env(), cli)
    }

    /// Merge defaults, file, environment and command line, then validate
    pub fn from_layers(
        file: Option<Value>,
        env: &ConfigOverrides,
        cli: &ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let mut layers = vec![BuiltinDefaults::default().to_value()];
        layers.extend(file);
        layers.push(env.to_value());
        layers.push(cli.to_value());

        let mut config: ClientConfig = serde_json::from_value(merge_layers(layers))?;
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        config.validate()?;
        Ok(config)
    }

    /// Parse TOML text into a mergeable layer
    pub fn parse_toml(content: &str) -> Result<Value, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    fn load_toml_file(path: &Path) -> Result<Value, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "base_url".to_string(),
                reason: format!("'{}' is not an http(s) URL", self.base_url),
            });
        }

        if self.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout_seconds".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        if self.api_token.is_some() && self.username.is_none() {
            return Err(ConfigError::InvalidValue {
                field: "api_token".to_string(),
                reason: "requires username".to_string(),
            });
        }

        Ok(())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("timeout_seconds", &self.timeout_seconds)
            .field("strict_validation", &self.strict_validation)
            .field("use_system_proxy", &self.use_system_proxy)
            .finish()
    }
}
