//! Network access for the pipeline: the source document and raw asset bytes.
//!
//! # Example
//!
//! ```no_run
//! use alchemy_core::fetch::HttpClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new();
//! let html = client
//!     .fetch_text("https://little-alchemy.fandom.com/wiki/Elements_(Little_Alchemy_2)")
//!     .await?;
//! println!("{} bytes", html.len());
//! # Ok(())
//! # }
//! ```

mod client;
pub mod constants;
mod error;
mod source;

pub use client::{ClientSettings, HttpClient};
pub use constants::{DEFAULT_MAX_REDIRECTS, MAX_REDIRECTS_LIMIT};
pub use error::FetchError;
pub use source::{DocumentSource, FileDocumentSource, HttpDocumentSource};
