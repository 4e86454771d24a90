//! Shared fixtures for fingerprint integration tests
//!
//! Canned Jenkins fingerprint records and a mock-backed session.

#![allow(dead_code)]

use std::sync::Arc;

use jenkins_fingerprint::client::{MockResponse, MockTransport};
use jenkins_fingerprint::Jenkins;
use serde_json::{json, Value};

pub const BASE_URL: &str = "http://jenkins.test:8080";

/// Hash used by most scenarios
pub const MD5: &str = "5d41402abc4b2a76b9719d911017c592";

/// JSON API URL the client requests for `id`
pub fn api_url(id: &str) -> String {
    format!("{}/fingerprint/{}/api/json", BASE_URL, id)
}

/// Record: created by job-a #5 as out.zip, used by job-b builds 1-3 and 10-12
pub fn job_a_record() -> Value {
    json!({
        "_class": "hudson.model.Fingerprint",
        "fileName": "out.zip",
        "hash": MD5,
        "original": {"name": "job-a", "number": 5},
        "timestamp": 1_700_000_000_000_i64,
        "usage": [
            {"name": "job-b", "ranges": {"ranges": [
                {"start": 1, "end": 3},
                {"start": 10, "end": 12}
            ]}}
        ]
    })
}

/// Session over a mock transport with no resources registered
pub fn session() -> (Arc<MockTransport>, Jenkins) {
    let transport = Arc::new(MockTransport::new());
    let jenkins = Jenkins::new(BASE_URL, transport.clone());
    (transport, jenkins)
}

/// Session where `MD5` resolves to `record`
pub fn session_with(record: Value) -> (Arc<MockTransport>, Jenkins) {
    let (transport, jenkins) = session();
    transport.respond_json(api_url(MD5), record);
    (transport, jenkins)
}

/// Session where `MD5` answers with `response`
pub fn session_responding(response: MockResponse) -> (Arc<MockTransport>, Jenkins) {
    let (transport, jenkins) = session();
    transport.respond(api_url(MD5), response);
    (transport, jenkins)
}
