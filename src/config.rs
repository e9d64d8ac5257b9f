//! Configuration types for the offline worker.

use std::time::Duration;

/// Configuration for network access and install behavior.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Origin that root-relative asset paths are resolved against.
    pub origin: String,
    /// Timeout applied to each live network request.
    pub request_timeout: Duration,
    /// Number of asset fetches kept in flight during install.
    pub concurrent_prefetch: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            origin: "http://127.0.0.1:5000".to_string(),
            request_timeout: Duration::from_secs(30),
            concurrent_prefetch: 4,
        }
    }
}

impl WorkerConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the origin that asset paths are resolved against.
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the number of concurrent asset fetches during install.
    #[must_use]
    pub const fn with_concurrent_prefetch(mut self, concurrent: usize) -> Self {
        self.concurrent_prefetch = concurrent;
        self
    }
}
