//! Session-level fingerprint helpers and artifact verification

mod fixtures;

use std::fs;

use fixtures::*;
use jenkins_api_types::md5_hex;
use jenkins_fingerprint::client::MockResponse;
use jenkins_fingerprint::{
    verify_download, ArtifactCheck, ArtifactError, BuildInfo, FingerprintError, Verified,
};
use serde_json::json;
use tempfile::TempDir;

#[test]
fn test_get_artifact_data() {
    let (transport, jenkins) = session_with(job_a_record());

    let info = jenkins.get_artifact_data(MD5).unwrap();
    assert_eq!(
        info,
        BuildInfo {
            job_name: "job-a".into(),
            build_number: 5,
            file_name: "out.zip".into(),
        }
    );
    // validate() and get_info() each fetch.
    assert_eq!(transport.request_count(), 2);
}

#[test]
fn test_get_artifact_data_for_untracked_hash() {
    let (_, jenkins) = session();
    let err = jenkins.get_artifact_data(MD5).unwrap_err();
    assert!(matches!(err, FingerprintError::Transport(ref e) if e.is_not_found()));
    assert_eq!(err.exit_code(), 3);
}

#[test]
fn test_validate_fingerprint() {
    let (_, jenkins) = session_with(job_a_record());
    jenkins.validate_fingerprint(MD5).unwrap();

    let (_, jenkins) = session_responding(MockResponse::Status(500));
    let err = jenkins.validate_fingerprint(MD5).unwrap_err();
    assert!(err.to_string().contains("seems to be broken"));
}

#[test]
fn test_validate_fingerprint_for_build() {
    let (_, jenkins) = session_with(job_a_record());
    assert!(jenkins
        .validate_fingerprint_for_build(MD5, "out.zip", "job-b", 10)
        .unwrap());
    assert!(!jenkins
        .validate_fingerprint_for_build(MD5, "out.zip", "job-b", 9)
        .unwrap());
    assert!(matches!(
        jenkins.validate_fingerprint_for_build("bogus", "out.zip", "job-b", 10),
        Err(FingerprintError::InvalidId(_))
    ));
}

#[test]
fn test_recorded_at_from_snapshot() {
    let (_, jenkins) = session_with(job_a_record());
    let fingerprint = jenkins.fingerprint(MD5).unwrap();
    let snapshot = fingerprint.fetch().unwrap();
    assert_eq!(
        snapshot.recorded_at().unwrap().timestamp_millis(),
        1_700_000_000_000
    );
    // fetch() does not touch the cached snapshot.
    assert!(fingerprint.data().is_none());
}

#[test]
fn test_verify_download_end_to_end() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.tar.gz");
    fs::write(&path, b"release bits").unwrap();
    let id = md5_hex(b"release bits");

    let (transport, jenkins) = session();
    transport.respond_json(
        api_url(id.as_str()),
        json!({
            "original": {"name": "folder/app", "number": 42},
            "fileName": "app.tar.gz",
            "usage": [{"name": "deploy", "ranges": {"ranges": [{"start": 3, "end": 8}]}}]
        }),
    );

    let built = verify_download(&jenkins, &path, &ArtifactCheck::new("folder/app", 42)).unwrap();
    assert_eq!(built, Verified::Confirmed { id: id.clone() });

    let deployed = verify_download(&jenkins, &path, &ArtifactCheck::new("deploy", 5)).unwrap();
    assert_eq!(deployed.id(), &id);

    let err = verify_download(&jenkins, &path, &ArtifactCheck::new("deploy", 9)).unwrap_err();
    assert!(matches!(err, ArtifactError::Broken { .. }));
    assert_eq!(
        err.to_string(),
        format!("Artifact {0} seems to be broken, check {1}/fingerprint/{0}/", id, BASE_URL)
    );
}
