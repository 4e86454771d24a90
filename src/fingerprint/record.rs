//! Fingerprint record handle and validation logic.

use std::fmt;

use jenkins_api_types::{BuildNumber, FingerprintData, FingerprintId, FINGERPRINT_SEGMENT};
use serde::Serialize;

use super::error::{ArtifactBroken, FingerprintError};
use crate::client::{Jenkins, TransportError};

/// Outcome of looking a fingerprint up on the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    /// The server has a record for this hash
    Confirmed,
    /// The server answered 404; fingerprint tracking may be disabled, so
    /// this is not evidence that the artifact is bad
    Untracked,
    /// The lookup failed for any other reason
    Invalid,
}

/// Where a fingerprinted file came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    pub job_name: String,
    pub build_number: BuildNumber,
    pub file_name: String,
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} #{} ({})", self.job_name, self.build_number, self.file_name)
    }
}

/// A fingerprint on one Jenkins server.
///
/// Construction does no I/O. Every check re-fetches the record; the last
/// successful snapshot is kept in [`Fingerprint::data`].
#[derive(Debug, Clone)]
pub struct Fingerprint {
    id: FingerprintId,
    base_url: String,
    url: String,
    session: Jenkins,
    data: Option<FingerprintData>,
    unknown: Option<bool>,
}

impl Fingerprint {
    /// Create a handle for `id` under `base_url`.
    ///
    /// Fails when `id` is not 32 lowercase hex characters.
    pub fn new(base_url: &str, id: &str, session: &Jenkins) -> Result<Self, FingerprintError> {
        let id = FingerprintId::parse(id)?;
        let base_url = base_url.trim_end_matches('/').to_string();
        let url = format!("{}/{}/{}/", base_url, FINGERPRINT_SEGMENT, id);

        Ok(Self {
            id,
            base_url,
            url,
            session: session.clone(),
            data: None,
            unknown: None,
        })
    }

    pub fn id(&self) -> &FingerprintId {
        &self.id
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resource URL, `{base_url}/fingerprint/{id}/`
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn session(&self) -> &Jenkins {
        &self.session
    }

    /// Last fetched record, if the last fetch succeeded
    pub fn data(&self) -> Option<&FingerprintData> {
        self.data.as_ref()
    }

    /// `None` until [`Fingerprint::is_valid`] has succeeded once, then
    /// whether the server reported the hash as not found
    pub fn unknown(&self) -> Option<bool> {
        self.unknown
    }

    /// Fetch a fresh snapshot of the record
    pub fn fetch(&self) -> Result<FingerprintData, TransportError> {
        self.session.get_json(&self.url)
    }

    /// Fetch and keep the snapshot; a failed fetch clears it
    pub fn poll(&mut self) -> Result<&FingerprintData, TransportError> {
        match self.fetch() {
            Ok(data) => Ok(&*self.data.insert(data)),
            Err(e) => {
                self.data = None;
                Err(e)
            }
        }
    }

    /// Job, build number and file name of the build that created this file
    pub fn get_info(&mut self) -> Result<BuildInfo, FingerprintError> {
        let data = self.poll()?.clone();
        let original = data.original.ok_or_else(|| FingerprintError::NoOriginalBuild {
            id: self.id.clone(),
        })?;

        Ok(BuildInfo {
            job_name: original.name,
            build_number: original.number,
            file_name: data.file_name,
        })
    }

    fn probe(&mut self) -> Result<Validity, TransportError> {
        let outcome = self.poll().map(|_| ());
        match outcome {
            Ok(()) => {
                self.unknown = Some(false);
                Ok(Validity::Confirmed)
            }
            Err(e) if e.is_not_found() => {
                tracing::warn!("MD5 cannot be checked if fingerprints are not enabled");
                self.unknown = Some(true);
                Ok(Validity::Untracked)
            }
            Err(e) => Err(e),
        }
    }

    /// Look the fingerprint up and classify the answer
    pub fn validity(&mut self) -> Validity {
        match self.probe() {
            Ok(validity) => validity,
            Err(e) => {
                tracing::debug!(fingerprint = %self.id, error = %e, "fingerprint lookup failed");
                Validity::Invalid
            }
        }
    }

    /// True when the server knows the hash, or answered 404.
    ///
    /// Check [`Fingerprint::unknown`] afterwards to tell the two apart.
    pub fn is_valid(&mut self) -> bool {
        self.validity() != Validity::Invalid
    }

    /// Whether this file was produced or used by `job` #`build`.
    ///
    /// An exact match on the original build is accepted before the file name
    /// is compared.
    pub fn validate_for_build(&mut self, filename: &str, job: &str, build: BuildNumber) -> bool {
        match self.validity() {
            Validity::Invalid => {
                tracing::info!("Fingerprint is not known to jenkins.");
                return false;
            }
            // Not a request error, just unknown to jenkins.
            Validity::Untracked => return true,
            Validity::Confirmed => {}
        }

        let Some(data) = self.data.as_ref() else {
            return false;
        };

        if data.original_matches(job, build) {
            return true;
        }

        if data.file_name != filename {
            tracing::info!(
                "Filename from jenkins ({}) did not match provided ({})",
                data.file_name,
                filename
            );
            return false;
        }

        match data.find_usage_range(job, build) {
            Some(range) => {
                tracing::info!(
                    "This artifact was generated by {} between build {} and {}",
                    job,
                    range.start,
                    range.end
                );
                true
            }
            None => false,
        }
    }

    /// Succeeds unless the fingerprint lookup fails.
    ///
    /// Never returns `Ok(false)`.
    pub fn validate(&mut self) -> Result<bool, ArtifactBroken> {
        match self.probe() {
            Ok(_) => Ok(true),
            Err(source) if source.is_unreachable() => Err(ArtifactBroken::Unverifiable {
                id: self.id.clone(),
                url: self.url.clone(),
                source,
            }),
            Err(source) => Err(ArtifactBroken::Broken {
                id: self.id.clone(),
                url: self.url.clone(),
                source,
            }),
        }
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{MockResponse, MockTransport};
    use serde_json::json;
    use std::sync::Arc;

    const BASE: &str = "http://ci.local:8080";
    const MD5: &str = "0123456789abcdef0123456789abcdef";

    fn api_url() -> String {
        format!("{}/fingerprint/{}/api/json", BASE, MD5)
    }

    fn setup() -> (Arc<MockTransport>, Fingerprint) {
        let transport = Arc::new(MockTransport::new());
        let jenkins = Jenkins::new(BASE, transport.clone());
        let fingerprint = Fingerprint::new(BASE, MD5, &jenkins).unwrap();
        (transport, fingerprint)
    }

    fn record() -> serde_json::Value {
        json!({
            "hash": MD5,
            "original": {"name": "job-a", "number": 5},
            "fileName": "out.zip",
            "usage": [
                {"name": "job-b", "ranges": {"ranges": [
                    {"start": 1, "end": 3},
                    {"start": 10, "end": 12}
                ]}}
            ]
        })
    }

    #[test]
    fn test_new_builds_resource_url() {
        let (transport, fingerprint) = setup();
        assert_eq!(fingerprint.url(), format!("{}/fingerprint/{}/", BASE, MD5));
        assert_eq!(fingerprint.to_string(), MD5);
        assert!(fingerprint.unknown().is_none());
        assert!(fingerprint.data().is_none());
        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn test_new_trims_base_url_slash() {
        let (_, fingerprint) = setup();
        let other = Fingerprint::new("http://ci.local:8080/", MD5, fingerprint.session()).unwrap();
        assert_eq!(other.url(), fingerprint.url());
    }

    #[test]
    fn test_new_rejects_malformed_id() {
        let (_, fingerprint) = setup();
        let err = Fingerprint::new(BASE, "ABCDEF0123456789ABCDEF0123456789", fingerprint.session())
            .unwrap_err();
        assert!(matches!(err, FingerprintError::InvalidId(_)));
    }

    #[test]
    fn test_poll_failure_clears_data() {
        let (transport, mut fingerprint) = setup();
        transport.respond_json(api_url(), record());
        fingerprint.poll().unwrap();
        assert!(fingerprint.data().is_some());

        transport.respond(api_url(), MockResponse::Status(503));
        assert!(fingerprint.poll().is_err());
        assert!(fingerprint.data().is_none());
    }

    #[test]
    fn test_validity_states() {
        let (transport, mut fingerprint) = setup();

        assert_eq!(fingerprint.validity(), Validity::Untracked);
        assert_eq!(fingerprint.unknown(), Some(true));

        transport.respond_json(api_url(), record());
        assert_eq!(fingerprint.validity(), Validity::Confirmed);
        assert_eq!(fingerprint.unknown(), Some(false));

        transport.respond(api_url(), MockResponse::Status(500));
        assert_eq!(fingerprint.validity(), Validity::Invalid);
        assert_eq!(fingerprint.unknown(), Some(false));
    }

    #[test]
    fn test_get_info() {
        let (transport, mut fingerprint) = setup();
        transport.respond_json(api_url(), record());

        let info = fingerprint.get_info().unwrap();
        assert_eq!(
            info,
            BuildInfo {
                job_name: "job-a".into(),
                build_number: 5,
                file_name: "out.zip".into(),
            }
        );
        assert_eq!(info.to_string(), "job-a #5 (out.zip)");
    }

    #[test]
    fn test_get_info_propagates_raw_transport_error() {
        let (_, mut fingerprint) = setup();
        let err = fingerprint.get_info().unwrap_err();
        assert!(matches!(err, FingerprintError::Transport(ref e) if e.is_not_found()));
    }

    #[test]
    fn test_get_info_without_original() {
        let (transport, mut fingerprint) = setup();
        transport.respond_json(
            api_url(),
            json!({"original": null, "fileName": "out.zip", "usage": []}),
        );

        let err = fingerprint.get_info().unwrap_err();
        assert!(matches!(err, FingerprintError::NoOriginalBuild { .. }));
    }

    #[test]
    fn test_validate_for_build_untracked_is_accepted() {
        let (_, mut fingerprint) = setup();
        assert!(fingerprint.validate_for_build("anything", "any-job", 99));
        assert_eq!(fingerprint.unknown(), Some(true));
    }

    #[test]
    fn test_validate_for_build_matching_second_range() {
        let (transport, mut fingerprint) = setup();
        transport.respond_json(api_url(), record());
        assert!(fingerprint.validate_for_build("out.zip", "job-b", 12));
        assert!(!fingerprint.validate_for_build("out.zip", "job-b", 13));
    }
}
