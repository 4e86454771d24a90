//! Fingerprint validation
//!
//! Confirms that a file with a given MD5 was produced by a given build of a
//! given job, using the server's fingerprint records.

mod error;
mod record;

pub use error::{ArtifactBroken, FailureKind, FingerprintError};
pub use record::{BuildInfo, Fingerprint, Validity};
