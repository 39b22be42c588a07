//! Icon asset downloads with a resumable on-disk cache.

mod downloader;
pub mod rate_limiter;

pub use downloader::{
    AssetFailure, AssetOutcome, DEFAULT_ICON_EXTENSION, IconDownloader, IconSummary, SkipReason,
};
pub use rate_limiter::{DEFAULT_REQUEST_DELAY, RateLimiter};
