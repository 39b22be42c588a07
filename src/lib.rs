//! Alchemy Dataset Core Library
//!
//! Builds a typed, cross-referenced dataset of crafting elements from the
//! Little Alchemy 2 wiki element page, and mirrors each element's icon into
//! a local cache.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`fetch`] - HTTP client with bounded manual redirects, document sources
//! - [`parse`] - Heading/table association and row extraction
//! - [`dataset`] - Identifiers, the element model, reverse index, artifact I/O
//! - [`icons`] - Paced, resumable icon downloads
//! - [`pipeline`] - Stage orchestration and the run report
//! - [`config`] - Defaults, config file and override merging

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod dataset;
pub mod fetch;
pub mod icons;
pub mod parse;
pub mod pipeline;
#[cfg(test)]
pub mod test_support;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use config::{ConfigOverrides, FileConfig, PipelineConfig, SourceLocation};
pub use dataset::{Dataset, DatasetError, Element, Recipe, normalize_id};
pub use fetch::{DocumentSource, FetchError, HttpClient};
pub use icons::{AssetOutcome, IconSummary};
pub use parse::parse_document;
pub use pipeline::{Pipeline, PipelineError, PipelineReport};
