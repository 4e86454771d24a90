//! Built-in client defaults (layer 1)

use serde::{Deserialize, Serialize};

/// Built-in default configuration values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Server root URL (default: "http://localhost:8080")
    pub base_url: String,

    /// Request timeout in seconds (default: 30)
    pub timeout_seconds: u64,

    /// Treat fingerprints unknown to the server as broken (default: false)
    pub strict_validation: bool,

    /// Honour proxy environment variables (default: true)
    pub use_system_proxy: bool,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_seconds: 30,
            strict_validation: false,
            use_system_proxy: true,
        }
    }
}

impl BuiltinDefaults {
    /// Convert to JSON Value for merging
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "base_url": self.base_url,
            "timeout_seconds": self.timeout_seconds,
            "strict_validation": self.strict_validation,
            "use_system_proxy": self.use_system_proxy,
        })
    }
}
