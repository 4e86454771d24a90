//! Fingerprint resource types.
//!
//! A fingerprint record is served at `/fingerprint/<md5>/api/json` and
//! tells which build first produced a file and which builds used it since.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, TimeZone, Utc};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::error::IdError;

/// Jenkins build number.
pub type BuildNumber = u64;

fn id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9a-f]{32}$").expect("static pattern compiles"))
}

/// A validated fingerprint id: 32 lowercase hexadecimal characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FingerprintId(String);

impl FingerprintId {
    /// Parse an id, rejecting anything that is not `^[0-9a-f]{32}$`.
    pub fn parse(id: &str) -> Result<Self, IdError> {
        if id_pattern().is_match(id) {
            Ok(Self(id.to_string()))
        } else {
            Err(IdError::malformed(id))
        }
    }

    /// Build an id from a raw 16-byte MD5 digest.
    pub fn from_digest(digest: [u8; 16]) -> Self {
        // hex::encode emits lowercase, so the pattern holds by construction.
        Self(hex::encode(digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FingerprintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for FingerprintId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for FingerprintId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<FingerprintId> for String {
    fn from(id: FingerprintId) -> Self {
        id.0
    }
}

impl AsRef<str> for FingerprintId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Decoded body of a fingerprint record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FingerprintData {
    /// The MD5 hash as echoed by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,

    /// Build that first produced the file (null for files Jenkins only saw used).
    #[serde(default)]
    pub original: Option<OriginalBuild>,

    /// File name recorded with the fingerprint.
    pub file_name: String,

    /// When the fingerprint was first recorded, in epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,

    /// Jobs that used the file, with the build ranges that did.
    #[serde(default)]
    pub usage: Vec<UsageEntry>,
}

/// The job and build number that created a fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginalBuild {
    pub name: String,
    pub number: BuildNumber,
}

/// Usage of a fingerprint by one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageEntry {
    /// Full job name.
    pub name: String,
    pub ranges: RangeSet,
}

/// Wrapper Jenkins puts around the list of ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeSet {
    #[serde(default)]
    pub ranges: Vec<BuildRange>,
}

/// A span of build numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRange {
    pub start: BuildNumber,
    pub end: BuildNumber,
}

impl BuildRange {
    /// Both bounds are inclusive.
    pub fn contains(&self, build: BuildNumber) -> bool {
        self.start <= build && build <= self.end
    }
}

impl fmt::Display for BuildRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl FingerprintData {
    /// Whether `job` #`build` is the build that created this fingerprint.
    pub fn original_matches(&self, job: &str, build: BuildNumber) -> bool {
        self.original
            .as_ref()
            .is_some_and(|original| original.name == job && original.number == build)
    }

    /// First recorded range of `job` that contains `build`.
    ///
    /// Usage entries and their ranges are scanned in server order; nothing
    /// assumes they are sorted or that a job appears only once.
    pub fn find_usage_range(&self, job: &str, build: BuildNumber) -> Option<&BuildRange> {
        self.usage
            .iter()
            .filter(|entry| entry.name == job)
            .flat_map(|entry| entry.ranges.ranges.iter())
            .find(|range| range.contains(build))
    }

    /// All builds of `job` that used this fingerprint, as ranges.
    pub fn usage_for<'a>(&'a self, job: &'a str) -> impl Iterator<Item = &'a BuildRange> + 'a {
        self.usage
            .iter()
            .filter(move |entry| entry.name == job)
            .flat_map(|entry| entry.ranges.ranges.iter())
    }

    /// Recording time, when the server reported one.
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
    }
}
