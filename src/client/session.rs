//! Jenkins Session
//!
//! The root object for one Jenkins server: holds the server URL and the
//! transport every resource on that server is fetched through.

use std::fmt;
use std::sync::Arc;

use jenkins_api_types::JSON_API_SUFFIX;
use serde::de::DeserializeOwned;

use super::transport::{HttpConfig, HttpTransport, Transport, TransportError};
use crate::config::ClientConfig;
use crate::fingerprint::{BuildInfo, Fingerprint, FingerprintError};

/// A connection to one Jenkins server.
///
/// Cloning is cheap; clones share the transport.
#[derive(Clone)]
pub struct Jenkins {
    base_url: String,
    transport: Arc<dyn Transport>,
}

impl Jenkins {
    /// Create a session for `base_url` using the given transport
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            transport,
        }
    }

    /// Create a session backed by an [`HttpTransport`] built from `config`
    pub fn from_config(config: &ClientConfig) -> Result<Self, TransportError> {
        let transport = HttpTransport::new(HttpConfig {
            timeout_seconds: config.timeout_seconds,
            username: config.username.clone(),
            api_token: config.api_token.clone(),
            use_system_proxy: config.use_system_proxy,
            ..HttpConfig::default()
        })?;
        Ok(Self::new(config.base_url.clone(), Arc::new(transport)))
    }

    /// Server root URL, without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// JSON API endpoint for a resource URL
    pub fn api_json_url(resource_url: &str) -> String {
        if resource_url.ends_with(JSON_API_SUFFIX) {
            resource_url.to_string()
        } else if resource_url.ends_with('/') {
            format!("{}{}", resource_url, JSON_API_SUFFIX)
        } else {
            format!("{}/{}", resource_url, JSON_API_SUFFIX)
        }
    }

    /// Fetch a resource's JSON API and decode it
    pub fn get_json<T: DeserializeOwned>(&self, resource_url: &str) -> Result<T, TransportError> {
        let value = self.transport.get_json(&Self::api_json_url(resource_url))?;
        Ok(serde_json::from_value(value)?)
    }

    /// Handle for the fingerprint `id` on this server (no I/O)
    pub fn fingerprint(&self, id: &str) -> Result<Fingerprint, FingerprintError> {
        Fingerprint::new(&self.base_url, id, self)
    }

    /// Check that `id` is not broken on this server
    pub fn validate_fingerprint(&self, id: &str) -> Result<(), FingerprintError> {
        let mut fingerprint = self.fingerprint(id)?;
        fingerprint.validate()?;
        tracing::info!("Jenkins says {} is valid", id);
        Ok(())
    }

    /// Job, build and file name that produced `id`
    pub fn get_artifact_data(&self, id: &str) -> Result<BuildInfo, FingerprintError> {
        let mut fingerprint = self.fingerprint(id)?;
        fingerprint.validate()?;
        fingerprint.get_info()
    }

    /// Whether `digest` was produced or used by `job` #`build` as `filename`
    pub fn validate_fingerprint_for_build(
        &self,
        digest: &str,
        filename: &str,
        job: &str,
        build: u64,
    ) -> Result<bool, FingerprintError> {
        let mut fingerprint = self.fingerprint(digest)?;
        Ok(fingerprint.validate_for_build(filename, job, build))
    }
}

impl fmt::Debug for Jenkins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Jenkins")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::transport::MockTransport;
    use serde_json::json;

    #[test]
    fn test_new_trims_trailing_slash() {
        let jenkins = Jenkins::new("http://ci.local:8080/", Arc::new(MockTransport::new()));
        assert_eq!(jenkins.base_url(), "http://ci.local:8080");
    }

    #[test]
    fn test_api_json_url() {
        assert_eq!(
            Jenkins::api_json_url("http://ci/fingerprint/abc/"),
            "http://ci/fingerprint/abc/api/json"
        );
        assert_eq!(
            Jenkins::api_json_url("http://ci/job/x"),
            "http://ci/job/x/api/json"
        );
        assert_eq!(
            Jenkins::api_json_url("http://ci/job/x/api/json"),
            "http://ci/job/x/api/json"
        );
    }

    #[test]
    fn test_get_json_decodes_typed() {
        #[derive(serde::Deserialize)]
        struct Root {
            mode: String,
        }

        let transport = Arc::new(MockTransport::new());
        transport.respond_json("http://ci/api/json", json!({"mode": "NORMAL"}));
        let jenkins = Jenkins::new("http://ci", transport.clone());

        let root: Root = jenkins.get_json("http://ci/").unwrap();
        assert_eq!(root.mode, "NORMAL");
        assert_eq!(transport.requests(), vec!["http://ci/api/json"]);
    }

    #[test]
    fn test_get_json_shape_mismatch_is_decode_error() {
        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Root {
            mode: String,
        }

        let transport = Arc::new(MockTransport::new());
        transport.respond_json("http://ci/api/json", json!({"mode": 3}));
        let jenkins = Jenkins::new("http://ci", transport);

        let err = jenkins.get_json::<Root>("http://ci/").unwrap_err();
        assert!(matches!(err, TransportError::Decode(_)));
    }

    #[test]
    fn test_fingerprint_rejects_bad_id() {
        let jenkins = Jenkins::new("http://ci", Arc::new(MockTransport::new()));
        assert!(matches!(
            jenkins.fingerprint("not-a-hash"),
            Err(FingerprintError::InvalidId(_))
        ));
    }
}
