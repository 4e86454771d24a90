//! Verification of downloaded artifacts against server fingerprints
//!
//! After downloading a build artifact, the client may check:
//! 1. the MD5 of the local file is a fingerprint the server knows
//! 2. that fingerprint was produced or used by the expected job and build
//!
//! An untracked fingerprint (server answered 404) passes unless strict
//! validation is requested.

use std::path::Path;

use jenkins_api_types::{fingerprint_of_file, BuildNumber, FingerprintId, IdError};

use crate::client::Jenkins;
use crate::fingerprint::{Fingerprint, FingerprintError};

/// What a downloaded file is expected to be
#[derive(Debug, Clone)]
pub struct ArtifactCheck {
    /// File name as recorded by Jenkins; defaults to the local file name
    pub file_name: Option<String>,
    /// Full job name
    pub job: String,
    /// Build number
    pub build: BuildNumber,
    /// Reject fingerprints the server does not track
    pub strict: bool,
}

impl ArtifactCheck {
    pub fn new(job: impl Into<String>, build: BuildNumber) -> Self {
        Self {
            file_name: None,
            job: job.into(),
            build,
            strict: false,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// How a verified artifact was accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verified {
    /// The server's record ties the file to the build
    Confirmed { id: FingerprintId },
    /// The server has no record; nothing contradicts the file
    Untracked { id: FingerprintId },
}

impl Verified {
    pub fn id(&self) -> &FingerprintId {
        match self {
            Verified::Confirmed { id } | Verified::Untracked { id } => id,
        }
    }
}

/// Artifact verification errors
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Failed to hash artifact: {0}")]
    Hash(#[from] IdError),

    #[error("Artifact path has no file name: {0}")]
    NoFileName(String),

    #[error(transparent)]
    Fingerprint(#[from] FingerprintError),

    #[error("Artifact {id} seems to be broken, check {url}")]
    Broken { id: FingerprintId, url: String },
}

impl ArtifactError {
    /// Get exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            ArtifactError::Hash(_) | ArtifactError::NoFileName(_) => 2,
            ArtifactError::Fingerprint(e) => e.exit_code(),
            ArtifactError::Broken { .. } => 4,
        }
    }
}

/// Verify a downloaded file against the server's fingerprint records
pub fn verify_download(
    session: &Jenkins,
    path: &Path,
    check: &ArtifactCheck,
) -> Result<Verified, ArtifactError> {
    let file_name = match check.file_name {
        Some(ref name) => name.clone(),
        None => path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| ArtifactError::NoFileName(path.display().to_string()))?,
    };

    let local_md5 = fingerprint_of_file(path)?;
    tracing::debug!(path = %path.display(), md5 = %local_md5, "hashed artifact");

    let mut fingerprint = Fingerprint::new(session.base_url(), local_md5.as_str(), session)?;
    let valid = fingerprint.validate_for_build(&file_name, &check.job, check.build);
    let untracked = fingerprint.unknown() == Some(true);

    if !valid || (untracked && check.strict) {
        return Err(ArtifactError::Broken {
            id: local_md5,
            url: fingerprint.url().to_string(),
        });
    }

    Ok(if untracked {
        Verified::Untracked { id: local_md5 }
    } else {
        Verified::Confirmed { id: local_md5 }
    })
}
