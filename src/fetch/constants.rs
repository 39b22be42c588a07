//! Constants for the fetch module (timeouts, redirect bounds).

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (5 minutes; the element page is large).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Default maximum number of 301/302 hops followed for a single request.
pub const DEFAULT_MAX_REDIRECTS: u8 = 5;

/// Upper bound accepted from configuration for [`DEFAULT_MAX_REDIRECTS`].
pub const MAX_REDIRECTS_LIMIT: u8 = 20;
