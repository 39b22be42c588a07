//! HTTP client wrapper for the document fetch and icon downloads.
//!
//! Transport-level redirects are disabled; [`HttpClient`] follows 301/302
//! hops itself so the hop bound and the missing-`Location` case are under
//! its control and can be reported per asset.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use reqwest::{Client, StatusCode};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, instrument};
use url::Url;

use super::constants::{CONNECT_TIMEOUT_SECS, DEFAULT_MAX_REDIRECTS, READ_TIMEOUT_SECS};
use super::error::FetchError;
use crate::user_agent;

/// Network settings for [`HttpClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientSettings {
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds.
    pub read_timeout_secs: u64,
    /// Maximum 301/302 hops followed per request.
    pub max_redirects: u8,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            read_timeout_secs: READ_TIMEOUT_SECS,
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}

/// HTTP client shared by every network stage of the pipeline.
///
/// Create once and reuse so requests share the connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    max_redirects: u8,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a client with default timeouts and redirect bound.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails with the static default
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self::with_settings(ClientSettings::default())
            .expect("failed to build HTTP client with static configuration")
    }

    /// Creates a client with explicit settings.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] when the underlying client cannot be built.
    pub fn with_settings(settings: ClientSettings) -> Result<Self, FetchError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .timeout(Duration::from_secs(settings.read_timeout_secs))
            .redirect(Policy::none())
            .gzip(true)
            .user_agent(user_agent::default_user_agent())
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self {
            client,
            max_redirects: settings.max_redirects,
        })
    }

    /// Returns the configured redirect bound.
    #[must_use]
    pub fn max_redirects(&self) -> u8 {
        self.max_redirects
    }

    /// Fetches `url` and returns the response body as text.
    ///
    /// No retries are attempted.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] on network failure, timeout, a non-2xx final
    /// status, or an exhausted redirect chain.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self.get_following_redirects(url).await?;
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::network(url, e))?;
        debug!(bytes = body.len(), "document fetched");
        Ok(body)
    }

    /// Fetches `url` and streams the body to `dest`.
    ///
    /// Bytes are written to a sibling `.part` file that is renamed onto
    /// `dest` only after the body has been fully written, so `dest` either
    /// does not exist or holds a complete asset.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] for any request failure or write error. The
    /// partial file is removed in that case.
    #[instrument(skip(self), fields(url = %url, dest = %dest.display()))]
    pub async fn download_to_path(&self, url: &str, dest: &Path) -> Result<u64, FetchError> {
        let response = self.get_following_redirects(url).await?;

        let partial = partial_path(dest);
        let mut file = File::create(&partial)
            .await
            .map_err(|e| FetchError::io(partial.clone(), e))?;

        let stream_result = stream_to_file(&mut file, response, url, &partial).await;
        drop(file);

        let bytes_written = match stream_result {
            Ok(bytes) => bytes,
            Err(error) => {
                debug!(path = %partial.display(), "cleaning up partial file after error");
                let _ = tokio::fs::remove_file(&partial).await;
                return Err(error);
            }
        };

        if let Err(e) = tokio::fs::rename(&partial, dest).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(FetchError::io(dest.to_path_buf(), e));
        }

        debug!(bytes = bytes_written, "asset written");
        Ok(bytes_written)
    }

    /// Sends a GET and follows up to `max_redirects` 301/302 hops.
    ///
    /// A relative `Location` is resolved against the URL that returned it.
    ///
    /// # Errors
    ///
    /// - [`FetchError::MissingLocation`] for a 301/302 without `Location`
    /// - [`FetchError::TooManyRedirects`] once the hop bound is exceeded
    /// - [`FetchError::HttpStatus`] for any other non-2xx status
    pub async fn get_following_redirects(
        &self,
        url: &str,
    ) -> Result<reqwest::Response, FetchError> {
        let mut current = Url::parse(url).map_err(|_| FetchError::invalid_url(url))?;
        let mut hops: u8 = 0;

        loop {
            let response = self
                .client
                .get(current.clone())
                .send()
                .await
                .map_err(|e| FetchError::network(current.as_str(), e))?;

            let status = response.status();
            if matches!(status, StatusCode::MOVED_PERMANENTLY | StatusCode::FOUND) {
                let Some(location) = response
                    .headers()
                    .get(LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                else {
                    return Err(FetchError::missing_location(
                        current.as_str(),
                        status.as_u16(),
                    ));
                };

                if hops >= self.max_redirects {
                    return Err(FetchError::too_many_redirects(url, hops));
                }

                let next = current
                    .join(location)
                    .map_err(|_| FetchError::invalid_url(location))?;
                hops += 1;
                debug!(from = %current, to = %next, hop = hops, "following redirect");
                current = next;
                continue;
            }

            if !status.is_success() {
                return Err(FetchError::http_status(current.as_str(), status.as_u16()));
            }

            return Ok(response);
        }
    }
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

/// Streams response body to file, returning bytes written.
async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
) -> Result<u64, FetchError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| FetchError::network(url, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| FetchError::io(file_path.to_path_buf(), e))?;

        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| FetchError::io(file_path.to_path_buf(), e))?;

    Ok(bytes_written)
}
