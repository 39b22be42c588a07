//! End-to-end run: fetch, parse, discover, download icons, write.
//!
//! Stages run strictly in order and each consumes the previous stage's
//! output. Only an unreachable source document, a page with zero elements
//! and a failed artifact write abort the run; everything else is logged,
//! counted and reported in [`PipelineReport`].

use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::config::{PipelineConfig, SourceLocation};
use crate::dataset::{Dataset, DatasetBuilder, DatasetError, Discovered, Element, IdConflict};
use crate::fetch::{
    DocumentSource, FetchError, FileDocumentSource, HttpClient, HttpDocumentSource,
};
use crate::icons::{AssetOutcome, IconDownloader, IconSummary, RateLimiter};
use crate::parse::{ExtractStats, ParsedPage, parse_document};

/// Fatal pipeline failures.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The HTTP client could not be constructed from the settings.
    #[error("HTTP client setup failed: {0}")]
    Client(#[source] FetchError),

    /// The source document could not be obtained.
    #[error("source document unavailable: {0}")]
    Source(#[from] FetchError),

    /// No dataset could be produced or written.
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

/// What a completed run did.
#[derive(Debug)]
pub struct PipelineReport {
    /// Where the document was read from.
    pub source: String,
    /// Headings processed.
    pub sections: usize,
    /// Headings without an element table.
    pub missing_tables: usize,
    /// Rows and recipe items skipped during extraction.
    pub extract_stats: ExtractStats,
    /// Rows ignored because the element was already listed.
    pub duplicates: usize,
    /// Distinct names that collided on one id.
    pub conflicts: Vec<IdConflict>,
    /// Icon pass results; `None` when icons were disabled.
    pub icons: Option<IconSummary>,
    /// Path of the written artifact.
    pub output: PathBuf,
    /// The dataset that was written.
    pub dataset: Dataset,
}

impl PipelineReport {
    /// Number of elements in the artifact.
    #[must_use]
    pub fn elements_found(&self) -> usize {
        self.dataset.total()
    }
}

/// One configured run of the pipeline.
pub struct Pipeline {
    config: PipelineConfig,
    client: HttpClient,
    source: Box<dyn DocumentSource>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("source", &self.source.describe())
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Builds the HTTP client and the document source named by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Client`] if the HTTP client cannot be built.
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        let client = HttpClient::with_settings(config.client).map_err(PipelineError::Client)?;
        let source: Box<dyn DocumentSource> = match &config.source {
            SourceLocation::Url(url) => Box::new(HttpDocumentSource::new(client.clone(), url)),
            SourceLocation::File(path) => Box::new(FileDocumentSource::new(path)),
        };
        Ok(Self {
            config,
            client,
            source,
        })
    }

    /// Runs every stage.
    ///
    /// `on_icon` is called once per element during the icon pass. It is not
    /// called when icons are disabled.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] when the source is unreachable, the page
    /// yields no elements, or the artifact cannot be written.
    #[instrument(skip(self, on_icon), fields(source = %self.source.describe()))]
    pub async fn run<F>(&self, on_icon: F) -> Result<PipelineReport, PipelineError>
    where
        F: FnMut(&Element, &AssetOutcome),
    {
        let html = self.source.fetch().await?;
        let page = parse_document(&html);
        drop(html);

        let sections = page.sections.len();
        let missing_tables = page.missing_tables();
        let extract_stats = page.stats;

        let discovered = discover(page);
        info!(
            elements = discovered.elements.len(),
            sections,
            missing_tables,
            duplicates = discovered.duplicates,
            conflicts = discovered.conflicts.len(),
            "Discovery finished"
        );
        if discovered.elements.is_empty() {
            warn!("no elements discovered; the page layout may have changed");
            return Err(DatasetError::Empty.into());
        }

        let icons = if self.config.download_icons {
            let mut downloader = IconDownloader::new(
                self.client.clone(),
                &self.config.icons_dir,
                &self.config.icon_extension,
                RateLimiter::new(self.config.request_delay),
            );
            Some(downloader.download_all(&discovered.elements, on_icon).await)
        } else {
            info!("Icon downloads disabled");
            None
        };

        let Discovered {
            elements,
            conflicts,
            duplicates,
        } = discovered;
        let dataset = Dataset::build(elements)?;
        dataset.write(&self.config.output).await?;
        info!(
            total = dataset.total(),
            path = %self.config.output.display(),
            "Dataset written"
        );

        Ok(PipelineReport {
            source: self.source.describe(),
            sections,
            missing_tables,
            extract_stats,
            duplicates,
            conflicts,
            icons,
            output: self.config.output.clone(),
            dataset,
        })
    }
}

/// Turns parsed sections into id-unique elements in document order.
#[must_use]
pub fn discover(page: ParsedPage) -> Discovered {
    let mut builder = DatasetBuilder::new();
    for section in page.sections {
        for row in section.rows {
            builder.insert(Element::new(row.name, section.tier, row.recipes, row.icon_ref));
        }
    }
    builder.finish()
}
