//! Request keys and response snapshots.

use std::fmt;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use reqwest::Method;

/// A request descriptor: HTTP method plus root-relative path.
///
/// Keys compare by exact match only: `GET /dashboard` and
/// `GET /dashboard?tab=fees` are distinct entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    method: Method,
    path: String,
}

impl RequestKey {
    /// Creates a key for an arbitrary method and path.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }

    /// Creates a `GET` key, the common case for shell assets.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// The HTTP method of this key.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// The root-relative path of this key.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// A stored copy of one HTTP response: status, headers, body, and when it
/// was captured from the network.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSnapshot {
    /// HTTP status code.
    pub status: u16,
    /// Headers in wire order. Duplicate names are preserved.
    pub headers: Vec<(String, String)>,
    /// Response body, byte-for-byte as received.
    pub body: Bytes,
    /// When the response was captured from the network.
    pub captured_at: DateTime<Utc>,
}

impl ResponseSnapshot {
    /// Creates a snapshot captured now.
    pub fn new(status: u16, headers: Vec<(String, String)>, body: impl Into<Bytes>) -> Self {
        Self::from_parts(status, headers, body, Utc::now())
    }

    /// Reassembles a snapshot from stored parts, keeping its original
    /// capture time.
    pub fn from_parts(
        status: u16,
        headers: Vec<(String, String)>,
        body: impl Into<Bytes>,
        captured_at: DateTime<Utc>,
    ) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
            captured_at,
        }
    }

    /// Whether the status code is in the 2xx range.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns the first header value matching `name`, case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
