//! Artifact integrity checks
//!
//! Hashes downloaded artifacts and confirms them against the server's
//! fingerprint records.

mod verify;

pub use verify::{verify_download, ArtifactCheck, ArtifactError, Verified};
