//! Best-effort icon downloads into the on-disk icon cache.
//!
//! Each element with an icon reference maps to `<icons_dir>/<id>.<ext>`. A
//! file already present at that path is the cache hit; nothing else is
//! checked. Failures are recorded per element and never abort the run.
//!
//! The cache is not locked: concurrent runs against the same directory are
//! not supported.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use super::rate_limiter::RateLimiter;
use crate::dataset::Element;
use crate::fetch::HttpClient;

/// Default icon file extension.
pub const DEFAULT_ICON_EXTENSION: &str = "svg";

/// Why an element's asset was not fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The file already exists in the icon cache.
    Cached,
    /// The element has no icon reference.
    NoIcon,
}

/// Result of processing one element's icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetOutcome {
    /// Fetched and written.
    Downloaded {
        /// Bytes written to the cache file.
        bytes: u64,
    },
    /// No request was made.
    Skipped(SkipReason),
    /// The request or the write failed.
    Failed {
        /// Display form of the underlying error.
        reason: String,
    },
}

/// A per-element failure kept for the run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFailure {
    pub id: String,
    pub reason: String,
}

/// Aggregate counts of an icon download pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IconSummary {
    pub downloaded: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Failures in processing order.
    pub failures: Vec<AssetFailure>,
}

impl IconSummary {
    /// Adds one element's outcome to the counts.
    pub fn record(&mut self, id: &str, outcome: &AssetOutcome) {
        match outcome {
            AssetOutcome::Downloaded { .. } => self.downloaded += 1,
            AssetOutcome::Skipped(_) => self.skipped += 1,
            AssetOutcome::Failed { reason } => {
                self.failed += 1;
                self.failures.push(AssetFailure {
                    id: id.to_string(),
                    reason: reason.clone(),
                });
            }
        }
    }

    /// Number of elements processed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.downloaded + self.failed + self.skipped
    }
}

/// Downloads element icons one at a time, in the order given.
#[derive(Debug)]
pub struct IconDownloader {
    client: HttpClient,
    icons_dir: PathBuf,
    extension: String,
    rate_limiter: RateLimiter,
}

impl IconDownloader {
    /// Creates a downloader writing `<icons_dir>/<id>.<extension>`.
    #[must_use]
    pub fn new(
        client: HttpClient,
        icons_dir: impl Into<PathBuf>,
        extension: impl Into<String>,
        rate_limiter: RateLimiter,
    ) -> Self {
        Self {
            client,
            icons_dir: icons_dir.into(),
            extension: extension.into(),
            rate_limiter,
        }
    }

    #[must_use]
    pub fn icons_dir(&self) -> &Path {
        &self.icons_dir
    }

    /// Cache path of the icon for element `id`.
    #[must_use]
    pub fn icon_path(&self, id: &str) -> PathBuf {
        self.icons_dir.join(format!("{id}.{}", self.extension))
    }

    /// Processes every element and returns the aggregate summary.
    ///
    /// `on_outcome` is called after each element, in order, for progress
    /// reporting.
    #[instrument(skip(self, elements, on_outcome), fields(elements = elements.len(), dir = %self.icons_dir.display()))]
    pub async fn download_all<F>(&mut self, elements: &[Element], mut on_outcome: F) -> IconSummary
    where
        F: FnMut(&Element, &AssetOutcome),
    {
        if let Err(e) = tokio::fs::create_dir_all(&self.icons_dir).await {
            warn!(error = %e, "could not create icon directory; downloads will fail");
        }

        let mut summary = IconSummary::default();
        for element in elements {
            let outcome = self.download_one(element).await;
            summary.record(&element.id, &outcome);
            on_outcome(element, &outcome);
        }

        info!(
            downloaded = summary.downloaded,
            failed = summary.failed,
            skipped = summary.skipped,
            "Icon downloads finished"
        );
        summary
    }

    /// Fetches one element's icon unless it is cached or absent.
    pub async fn download_one(&mut self, element: &Element) -> AssetOutcome {
        let Some(url) = element.icon_ref.as_deref() else {
            debug!(id = %element.id, "no icon reference");
            return AssetOutcome::Skipped(SkipReason::NoIcon);
        };

        let path = self.icon_path(&element.id);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            debug!(id = %element.id, path = %path.display(), "icon cached; skipping");
            return AssetOutcome::Skipped(SkipReason::Cached);
        }

        self.rate_limiter.acquire().await;
        let result = self.client.download_to_path(url, &path).await;
        self.rate_limiter.record_request();

        match result {
            Ok(bytes) => {
                debug!(id = %element.id, bytes, "icon downloaded");
                AssetOutcome::Downloaded { bytes }
            }
            Err(error) => {
                warn!(id = %element.id, url, error = %error, "icon download failed");
                AssetOutcome::Failed {
                    reason: error.to_string(),
                }
            }
        }
    }
}
