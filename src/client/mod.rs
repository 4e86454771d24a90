//! REST Client
//!
//! Session and transport for talking to a Jenkins server's JSON API.

pub mod session;
pub mod transport;

pub use session::Jenkins;
pub use transport::{HttpConfig, HttpTransport, MockResponse, MockTransport, Transport, TransportError};
