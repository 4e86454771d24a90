//! Jenkins API Types
//!
//! Defines the JSON resources returned by a Jenkins server's REST API
//! for fingerprint lookups, plus the MD5 digests Jenkins uses as
//! fingerprint ids.

pub mod digest;
pub mod error;
pub mod fingerprint;

pub use digest::{fingerprint_of_file, md5_hex, md5_reader};
pub use error::IdError;
pub use fingerprint::{
    BuildNumber, BuildRange, FingerprintData, FingerprintId, OriginalBuild, RangeSet, UsageEntry,
};

/// Path segment under the server root that holds fingerprint records.
pub const FINGERPRINT_SEGMENT: &str = "fingerprint";

/// Suffix appended to a resource URL to reach its JSON representation.
pub const JSON_API_SUFFIX: &str = "api/json";
