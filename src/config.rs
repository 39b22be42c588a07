//! Run configuration: built-in defaults, an optional config file, and
//! command-line overrides, in increasing precedence.
//!
//! The config file uses a flat `key = value` subset of TOML:
//!
//! ```toml
//! # ~/.config/alchemy-dataset/config.toml
//! source_url = "https://little-alchemy.fandom.com/wiki/Elements_(Little_Alchemy_2)"
//! output = "data/elements.json"
//! icons_dir = "data/icons"
//! request_delay_ms = 250
//! download_icons = true
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};

use crate::fetch::{
    ClientSettings, DEFAULT_MAX_REDIRECTS, MAX_REDIRECTS_LIMIT, constants::CONNECT_TIMEOUT_SECS,
    constants::READ_TIMEOUT_SECS,
};
use crate::icons::{DEFAULT_ICON_EXTENSION, DEFAULT_REQUEST_DELAY};

/// The wiki page listing every element and its recipes.
pub const DEFAULT_SOURCE_URL: &str =
    "https://little-alchemy.fandom.com/wiki/Elements_(Little_Alchemy_2)";

/// Default path of the dataset artifact.
pub const DEFAULT_OUTPUT_PATH: &str = "data/elements.json";

/// Default icon cache directory.
pub const DEFAULT_ICONS_DIR: &str = "data/icons";

/// Largest accepted request delay in milliseconds.
pub const MAX_REQUEST_DELAY_MS: u64 = 60_000;

const CONFIG_DIR_NAME: &str = "alchemy-dataset";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Values read from the config file; `None` means "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    pub source_url: Option<String>,
    pub output: Option<PathBuf>,
    pub icons_dir: Option<PathBuf>,
    pub icon_extension: Option<String>,
    pub request_delay_ms: Option<u64>,
    pub max_redirects: Option<u8>,
    pub connect_timeout_secs: Option<u64>,
    pub read_timeout_secs: Option<u64>,
    pub download_icons: Option<bool>,
}

impl FileConfig {
    /// Validates values against the same ranges the CLI accepts.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first out-of-range key.
    pub fn validate(&self) -> Result<()> {
        if let Some(delay) = self.request_delay_ms
            && delay > MAX_REQUEST_DELAY_MS
        {
            bail!(
                "Invalid config value for `request_delay_ms`: {delay}. Expected range: 0..={MAX_REQUEST_DELAY_MS}"
            );
        }
        if let Some(hops) = self.max_redirects
            && hops > MAX_REDIRECTS_LIMIT
        {
            bail!(
                "Invalid config value for `max_redirects`: {hops}. Expected range: 0..={MAX_REDIRECTS_LIMIT}"
            );
        }
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        validate_timeout_secs("read_timeout_secs", self.read_timeout_secs)?;
        if let Some(extension) = &self.icon_extension {
            validate_extension(extension)?;
        }
        Ok(())
    }
}

fn validate_timeout_secs(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(1..=3600).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 1..=3600");
    }
    Ok(())
}

/// Icon extensions must be a plain file suffix.
///
/// # Errors
///
/// Returns an error for empty values or values containing anything other
/// than ASCII alphanumerics.
pub fn validate_extension(extension: &str) -> Result<()> {
    if extension.is_empty() || !extension.chars().all(|c| c.is_ascii_alphanumeric()) {
        bail!("Invalid icon extension '{extension}': expected ASCII letters and digits only");
    }
    Ok(())
}

/// Resolves the default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/alchemy-dataset/config.toml`
/// 2. `$HOME/.config/alchemy-dataset/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join(CONFIG_DIR_NAME)
                .join(CONFIG_FILE_NAME),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads the config file at `explicit`, or the default path if present.
///
/// An explicit path must exist; a missing default file yields `Ok(None)`.
///
/// # Errors
///
/// Returns an error when the file cannot be read, parsed or validated.
pub fn load_file_config(explicit: Option<&Path>) -> Result<Option<FileConfig>> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match resolve_default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(None),
        },
    };

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    let config = parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid config file '{}'", path.display()))?;
    Ok(Some(config))
}

/// Parses the `key = value` config format.
///
/// # Errors
///
/// Returns an error naming the line for bad syntax, bad values or unknown keys.
pub fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line_no = line_index + 1;
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_no}: expected key = value");
        };
        let key = raw_key.trim();
        let value = raw_value.trim();
        let context = || format!("Invalid `{key}` value on line {line_no}");

        match key {
            "source_url" => cfg.source_url = Some(parse_string_literal(value).with_context(context)?),
            "output" => {
                cfg.output = Some(PathBuf::from(
                    parse_string_literal(value).with_context(context)?,
                ));
            }
            "icons_dir" => {
                cfg.icons_dir = Some(PathBuf::from(
                    parse_string_literal(value).with_context(context)?,
                ));
            }
            "icon_extension" => {
                cfg.icon_extension = Some(parse_string_literal(value).with_context(context)?);
            }
            "request_delay_ms" => {
                cfg.request_delay_ms = Some(parse_integer(value).with_context(context)?);
            }
            "max_redirects" => {
                let parsed = parse_integer(value).with_context(context)?;
                cfg.max_redirects = Some(
                    u8::try_from(parsed)
                        .map_err(|_| anyhow::anyhow!("max_redirects out of range for u8"))
                        .with_context(context)?,
                );
            }
            "connect_timeout_secs" => {
                cfg.connect_timeout_secs = Some(parse_integer(value).with_context(context)?);
            }
            "read_timeout_secs" => {
                cfg.read_timeout_secs = Some(parse_integer(value).with_context(context)?);
            }
            "download_icons" => {
                cfg.download_icons = Some(parse_boolean(value).with_context(context)?);
            }
            unknown => bail!("Unknown config key `{unknown}` on line {line_no}"),
        }
    }
    Ok(cfg)
}

/// Drops a `#` comment that is not inside a quoted string.
fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(value: &str) -> Result<String> {
    let Some(inner) = value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        bail!("expected a double-quoted string, got `{value}`");
    };
    Ok(inner.to_string())
}

fn parse_integer(value: &str) -> Result<u64> {
    value
        .replace('_', "")
        .parse::<u64>()
        .with_context(|| format!("expected a non-negative integer, got `{value}`"))
}

fn parse_boolean(value: &str) -> Result<bool> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        other => bail!("expected true or false, got `{other}`"),
    }
}

/// Where the source document is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Url(String),
    File(PathBuf),
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub source_url: Option<String>,
    pub input_file: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub icons_dir: Option<PathBuf>,
    pub icon_extension: Option<String>,
    pub request_delay_ms: Option<u64>,
    pub max_redirects: Option<u8>,
    pub no_icons: bool,
}

/// Fully resolved settings for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub source: SourceLocation,
    pub output: PathBuf,
    pub icons_dir: PathBuf,
    pub icon_extension: String,
    pub request_delay: Duration,
    pub download_icons: bool,
    pub client: ClientSettings,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source: SourceLocation::Url(DEFAULT_SOURCE_URL.to_string()),
            output: PathBuf::from(DEFAULT_OUTPUT_PATH),
            icons_dir: PathBuf::from(DEFAULT_ICONS_DIR),
            icon_extension: DEFAULT_ICON_EXTENSION.to_string(),
            request_delay: DEFAULT_REQUEST_DELAY,
            download_icons: true,
            client: ClientSettings::default(),
        }
    }
}

impl PipelineConfig {
    /// Merges defaults, file values and overrides.
    ///
    /// # Errors
    ///
    /// Returns an error when an override is out of range.
    pub fn resolve(file: Option<&FileConfig>, overrides: &ConfigOverrides) -> Result<Self> {
        let file = file.cloned().unwrap_or_default();
        let defaults = Self::default();

        let source = match (&overrides.input_file, &overrides.source_url, file.source_url) {
            (Some(path), _, _) => SourceLocation::File(path.clone()),
            (None, Some(url), _) => SourceLocation::Url(url.clone()),
            (None, None, Some(url)) => SourceLocation::Url(url),
            (None, None, None) => defaults.source,
        };

        let icon_extension = overrides
            .icon_extension
            .clone()
            .or(file.icon_extension)
            .unwrap_or(defaults.icon_extension);
        validate_extension(&icon_extension)?;

        let request_delay = overrides
            .request_delay_ms
            .or(file.request_delay_ms)
            .map_or(defaults.request_delay, Duration::from_millis);
        if request_delay > Duration::from_millis(MAX_REQUEST_DELAY_MS) {
            bail!("request delay must be at most {MAX_REQUEST_DELAY_MS} ms");
        }

        let max_redirects = overrides
            .max_redirects
            .or(file.max_redirects)
            .unwrap_or(DEFAULT_MAX_REDIRECTS);
        if max_redirects > MAX_REDIRECTS_LIMIT {
            bail!("max redirects must be at most {MAX_REDIRECTS_LIMIT}");
        }

        Ok(Self {
            source,
            output: overrides
                .output
                .clone()
                .or(file.output)
                .unwrap_or(defaults.output),
            icons_dir: overrides
                .icons_dir
                .clone()
                .or(file.icons_dir)
                .unwrap_or(defaults.icons_dir),
            icon_extension,
            request_delay,
            download_icons: !overrides.no_icons && file.download_icons.unwrap_or(true),
            client: ClientSettings {
                connect_timeout_secs: file.connect_timeout_secs.unwrap_or(CONNECT_TIMEOUT_SECS),
                read_timeout_secs: file.read_timeout_secs.unwrap_or(READ_TIMEOUT_SECS),
                max_redirects,
            },
        })
    }
}
