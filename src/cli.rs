//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use alchemy_core::ConfigOverrides;
use alchemy_core::config::MAX_REQUEST_DELAY_MS;
use clap::Parser;

/// Scrape the Little Alchemy 2 element list into a JSON dataset.
///
/// Fetches the wiki element page, extracts every element with its tier and
/// recipes, mirrors the icons into a local cache and writes a sorted,
/// cross-referenced artifact.
#[derive(Parser, Debug)]
#[command(name = "alchemy-dataset")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Config file (default: $XDG_CONFIG_HOME/alchemy-dataset/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Wiki page listing the elements
    #[arg(long, value_name = "URL", conflicts_with = "input_file")]
    pub source_url: Option<String>,

    /// Read a saved copy of the wiki page instead of fetching it
    #[arg(long, value_name = "PATH")]
    pub input_file: Option<PathBuf>,

    /// Dataset artifact path (default: data/elements.json)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Icon cache directory (default: data/icons)
    #[arg(long, value_name = "DIR")]
    pub icons_dir: Option<PathBuf>,

    /// File extension for cached icons (default: svg)
    #[arg(long, value_name = "EXT")]
    pub icon_extension: Option<String>,

    /// Delay between icon requests in milliseconds (0 to disable, max 60000)
    #[arg(short = 'd', long, value_parser = clap::value_parser!(u64).range(0..=MAX_REQUEST_DELAY_MS))]
    pub delay_ms: Option<u64>,

    /// Maximum 301/302 redirects followed per request (0-20)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=20))]
    pub max_redirects: Option<u8>,

    /// Skip the icon download stage
    #[arg(long)]
    pub no_icons: bool,
}

impl Args {
    /// Command-line values that override the config file.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            source_url: self.source_url.clone(),
            input_file: self.input_file.clone(),
            output: self.output.clone(),
            icons_dir: self.icons_dir.clone(),
            icon_extension: self.icon_extension.clone(),
            request_delay_ms: self.delay_ms,
            max_redirects: self.max_redirects,
            no_icons: self.no_icons,
        }
    }
}
