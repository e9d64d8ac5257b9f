//! Error types for the shellcache library.

use thiserror::Error;

/// Errors that can occur during cache operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level HTTP failure (connection refused, DNS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error during store operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Manifest file could not be parsed.
    #[error("manifest parse failed: {0}")]
    ManifestParse(#[from] toml::de::Error),

    /// Manifest content failed validation.
    #[error("invalid manifest: {0}")]
    ManifestInvalid(String),

    /// Entry metadata could not be encoded for storage.
    #[error("metadata encode failed: {0}")]
    MetadataEncode(#[from] toml::ser::Error),

    /// Precaching an asset failed during install.
    #[error("install failed while precaching {path}: {source}")]
    Install {
        /// Asset path whose fetch or store aborted the install.
        path: String,
        /// Underlying failure.
        #[source]
        source: Box<Error>,
    },

    /// An asset fetched during install came back with a non-success status.
    #[error("install fetch for {path} returned HTTP {status}")]
    InstallStatus {
        /// Asset path that returned the error status.
        path: String,
        /// The HTTP status code received.
        status: u16,
    },

    /// A stored entry exists but could not be decoded.
    #[error("corrupt cache entry for {key}: {detail}")]
    CorruptEntry {
        /// Canonical form of the request key.
        key: String,
        /// What failed while decoding the entry.
        detail: String,
    },
}

/// A specialized `Result` type for shellcache operations.
pub type Result<T> = std::result::Result<T, Error>;
