//! Transport Layer for the REST Client
//!
//! Abstracts the HTTP connection for testability. Provides:
//! - Transport trait: GET a URL and decode the body as JSON
//! - MockTransport: in-process canned responses for unit tests
//! - HttpTransport: blocking reqwest client for production

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde_json::Value;

/// Transport trait for REST communication
pub trait Transport: Send + Sync {
    /// GET `url` and return the decoded JSON body
    fn get_json(&self, url: &str) -> Result<Value, TransportError>;
}

/// Transport errors
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Connection timeout")]
    Timeout,

    #[error("Invalid response JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

impl TransportError {
    /// HTTP status code, when the server answered with one
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the server answered 404
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Whether no response was received at all
    pub fn is_unreachable(&self) -> bool {
        matches!(self, TransportError::Connection(_) | TransportError::Timeout)
    }
}

/// Canned response served by [`MockTransport`]
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// 200 with this JSON body
    Json(Value),
    /// Error status with an empty body
    Status(u16),
    /// 200 with a body that is not JSON
    Malformed(String),
    /// No response at all
    ConnectionFailure(String),
    /// Request timed out
    Timeout,
}

/// Mock transport for testing - serves canned responses keyed by URL.
///
/// URLs without a registered response answer 404, like a Jenkins server
/// that has never seen the resource.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<HashMap<String, MockResponse>>,
    requests: Mutex<Vec<String>>,
}

impl MockTransport {
    /// Create a mock transport with no resources
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the response for a URL
    pub fn respond(&self, url: impl Into<String>, response: MockResponse) {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(url.into(), response);
    }

    /// Register a 200 JSON response for a URL
    pub fn respond_json(&self, url: impl Into<String>, body: Value) {
        self.respond(url, MockResponse::Json(body));
    }

    /// URLs requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of requests served so far
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl Transport for MockTransport {
    fn get_json(&self, url: &str) -> Result<Value, TransportError> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(url.to_string());

        let response = self
            .responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(url)
            .cloned()
            .unwrap_or(MockResponse::Status(404));

        match response {
            MockResponse::Json(body) => Ok(body),
            MockResponse::Status(status) => Err(TransportError::Http {
                status,
                url: url.to_string(),
            }),
            MockResponse::Malformed(body) => Ok(serde_json::from_str(&body)?),
            MockResponse::ConnectionFailure(reason) => Err(TransportError::Connection(reason)),
            MockResponse::Timeout => Err(TransportError::Timeout),
        }
    }
}

/// HTTP transport configuration
#[derive(Clone)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User for basic auth
    pub username: Option<String>,
    /// API token (or password) for basic auth
    pub api_token: Option<String>,
    /// User-Agent header
    pub user_agent: String,
    /// Honour HTTP(S)_PROXY from the environment
    pub use_system_proxy: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            username: None,
            api_token: None,
            user_agent: format!("jenkins-fingerprint/{}", env!("CARGO_PKG_VERSION")),
            use_system_proxy: true,
        }
    }
}

impl std::fmt::Debug for HttpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpConfig")
            .field("timeout_seconds", &self.timeout_seconds)
            .field("username", &self.username)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("user_agent", &self.user_agent)
            .field("use_system_proxy", &self.use_system_proxy)
            .finish()
    }
}

/// HTTP transport for production use
///
/// Issues one blocking GET per call. No retries; timeouts come from
/// [`HttpConfig::timeout_seconds`].
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    config: HttpConfig,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given configuration
    pub fn new(config: HttpConfig) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .default_headers(headers);
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::Connection(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HttpConfig {
        &self.config
    }
}

impl Transport for HttpTransport {
    fn get_json(&self, url: &str) -> Result<Value, TransportError> {
        let mut request = self.client.get(url);
        if let Some(ref user) = self.config.username {
            request = request.basic_auth(user, self.config.api_token.as_deref());
        }

        tracing::debug!(url, "GET");
        let response = request.send().map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else {
                TransportError::Connection(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else {
                TransportError::Connection(format!("Failed to read response body: {}", e))
            }
        })?;

        Ok(serde_json::from_str(&body)?)
    }
}
