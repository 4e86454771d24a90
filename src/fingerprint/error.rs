//! Fingerprint error types.

use jenkins_api_types::{FingerprintId, IdError};

use crate::client::TransportError;

/// Integrity failure raised by [`super::Fingerprint::validate`].
///
/// One error kind with two diagnostics: the server answered with something
/// that is not a usable record, or the server could not be reached.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactBroken {
    #[error("Artifact {id} seems to be broken, check {url}")]
    Broken {
        id: FingerprintId,
        url: String,
        #[source]
        source: TransportError,
    },

    #[error("Unable to validate artifact id {id} using {url}")]
    Unverifiable {
        id: FingerprintId,
        url: String,
        #[source]
        source: TransportError,
    },
}

impl ArtifactBroken {
    pub fn id(&self) -> &FingerprintId {
        match self {
            ArtifactBroken::Broken { id, .. } | ArtifactBroken::Unverifiable { id, .. } => id,
        }
    }

    /// The transport failure behind this error
    pub fn transport_error(&self) -> &TransportError {
        match self {
            ArtifactBroken::Broken { source, .. } | ArtifactBroken::Unverifiable { source, .. } => {
                source
            }
        }
    }
}

/// Fingerprint errors
#[derive(Debug, thiserror::Error)]
pub enum FingerprintError {
    #[error(transparent)]
    InvalidId(#[from] IdError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Fingerprint {id} has no original build recorded")]
    NoOriginalBuild { id: FingerprintId },

    #[error(transparent)]
    ArtifactBroken(#[from] ArtifactBroken),
}

/// Failure kind for exit code mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Validation answered "no" (exit code 1)
    Invalid = 1,
    /// Bad input or configuration (exit code 2)
    Usage = 2,
    /// Server unreachable or returned an error (exit code 3)
    Transport = 3,
    /// Artifact integrity could not be established (exit code 4)
    Integrity = 4,
}

impl FingerprintError {
    /// Map error to failure kind for exit code
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            FingerprintError::InvalidId(_) => FailureKind::Usage,
            FingerprintError::Transport(_) => FailureKind::Transport,
            FingerprintError::NoOriginalBuild { .. } => FailureKind::Invalid,
            FingerprintError::ArtifactBroken(_) => FailureKind::Integrity,
        }
    }

    /// Get exit code for this error
    pub fn exit_code(&self) -> i32 {
        self.failure_kind() as i32
    }
}
