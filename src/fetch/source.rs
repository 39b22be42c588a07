//! Where the raw wiki page comes from.
//!
//! The pipeline reads exactly one document per run. It normally comes from
//! the wiki over HTTP; a saved snapshot on disk can stand in for it so a run
//! can be repeated against byte-identical input.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{info, instrument};

use super::client::HttpClient;
use super::error::FetchError;

/// A provider of the raw source document text.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Returns the full document text.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the document is unreachable. Callers treat
    /// this as fatal.
    async fn fetch(&self) -> Result<String, FetchError>;

    /// Human-readable location for logs and summaries.
    fn describe(&self) -> String;
}

/// Fetches the document from a URL.
#[derive(Debug, Clone)]
pub struct HttpDocumentSource {
    client: HttpClient,
    url: String,
}

impl HttpDocumentSource {
    /// Creates a source reading `url` through `client`.
    #[must_use]
    pub fn new(client: HttpClient, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl DocumentSource for HttpDocumentSource {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<String, FetchError> {
        info!("Fetching wiki page");
        self.client.fetch_text(&self.url).await
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Reads a previously saved copy of the document from disk.
#[derive(Debug, Clone)]
pub struct FileDocumentSource {
    path: PathBuf,
}

impl FileDocumentSource {
    /// Creates a source reading `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DocumentSource for FileDocumentSource {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn fetch(&self) -> Result<String, FetchError> {
        info!("Reading saved wiki page");
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| FetchError::io(self.path.clone(), e))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
