//! Error types for the fetch module.
//!
//! Every variant carries the URL (or path) it concerns so that per-asset
//! failures can be reported without extra bookkeeping at the call site.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while fetching the source document or an icon asset.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout fetching {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// Non-success HTTP response that is not a followable redirect.
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// The URL that returned the status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The URL is malformed, or a `Location` header could not be resolved against it.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// The redirect chain was longer than the configured bound.
    #[error("too many redirects fetching {url} (gave up after {hops} hops)")]
    TooManyRedirects {
        /// The URL that started the chain.
        url: String,
        /// Number of hops followed before giving up.
        hops: u8,
    },

    /// A 301/302 response carried no usable `Location` header.
    #[error("HTTP {status} without Location header fetching {url}")]
    MissingLocation {
        /// The URL that returned the redirect.
        url: String,
        /// The redirect status code.
        status: u16,
    },

    /// File system error (reading a local snapshot, writing an asset).
    #[error("IO error at {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The HTTP client could not be constructed.
    #[error("HTTP client construction failed: {0}")]
    Client(String),
}

impl FetchError {
    /// Creates a network error from a reqwest error, promoting timeouts.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            return Self::Timeout { url: url.into() };
        }
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates a redirect-exhaustion error.
    pub fn too_many_redirects(url: impl Into<String>, hops: u8) -> Self {
        Self::TooManyRedirects {
            url: url.into(),
            hops,
        }
    }

    /// Creates a missing-Location error.
    pub fn missing_location(url: impl Into<String>, status: u16) -> Self {
        Self::MissingLocation {
            url: url.into(),
            status,
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

// No From<reqwest::Error> / From<std::io::Error>: every variant needs the url or
// path, which the source errors do not carry.
