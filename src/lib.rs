//! Jenkins Fingerprint - artifact provenance checks against a Jenkins server
//!
//! This crate is a client binding for the Jenkins REST API. It fetches
//! fingerprint records over HTTP and confirms that an artifact with a given
//! MD5 was produced by a named build of a named job.

pub mod artifact;
pub mod client;
pub mod config;
pub mod fingerprint;

pub use artifact::{verify_download, ArtifactCheck, ArtifactError, Verified};
pub use client::{HttpTransport, Jenkins, MockTransport, Transport, TransportError};
pub use config::{ClientConfig, ConfigError, ConfigOverrides};
pub use fingerprint::{ArtifactBroken, BuildInfo, Fingerprint, FingerprintError, Validity};
pub use jenkins_api_types::{FingerprintData, FingerprintId};
