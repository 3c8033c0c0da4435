//! Embedded site data and optional on-disk overrides.
//!
//! The catalog and showcase descriptors are compiled into the binary. A
//! different data file (TOML or JSON) can be supplied at startup instead.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, SiteError};
use crate::models::{Paper, ShowcaseData};

pub const EMBEDDED_PAPERS: &str = include_str!("../data/papers.toml");
pub const EMBEDDED_SHOWCASE: &str = include_str!("../data/showcase.toml");

/// Serialization format of a data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Toml,
    Json,
}

impl DataFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(DataFormat::Toml),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(DataFormat::Json),
            _ => Err(SiteError::UnknownFormat(path.display().to_string())),
        }
    }
}

#[derive(Deserialize)]
struct PaperFile {
    #[serde(default)]
    papers: Vec<Paper>,
}

/// JSON catalogs may be a bare array or wrapped in `{"papers": [...]}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonPapers {
    Bare(Vec<Paper>),
    Wrapped(PaperFile),
}

pub fn parse_papers(text: &str, format: DataFormat) -> Result<Vec<Paper>> {
    match format {
        DataFormat::Toml => Ok(toml::from_str::<PaperFile>(text)?.papers),
        DataFormat::Json => match serde_json::from_str::<JsonPapers>(text)? {
            JsonPapers::Bare(papers) => Ok(papers),
            JsonPapers::Wrapped(file) => Ok(file.papers),
        },
    }
}

pub fn parse_showcase(text: &str, format: DataFormat) -> Result<ShowcaseData> {
    match format {
        DataFormat::Toml => Ok(toml::from_str(text)?),
        DataFormat::Json => Ok(serde_json::from_str(text)?),
    }
}

/// Load papers from `path`, or the embedded catalog when no path is given.
pub fn load_papers(path: Option<&Path>) -> Result<Vec<Paper>> {
    match path {
        Some(path) => {
            debug!("Loading papers from {}", path.display());
            let format = DataFormat::from_path(path)?;
            let text = std::fs::read_to_string(path).map_err(|e| SiteError::io(path, e))?;
            parse_papers(&text, format)
        }
        None => parse_papers(EMBEDDED_PAPERS, DataFormat::Toml),
    }
}

/// Load showcase documents from `path`, or the embedded descriptors.
pub fn load_showcase(path: Option<&Path>) -> Result<ShowcaseData> {
    match path {
        Some(path) => {
            debug!("Loading showcase data from {}", path.display());
            let format = DataFormat::from_path(path)?;
            let text = std::fs::read_to_string(path).map_err(|e| SiteError::io(path, e))?;
            parse_showcase(&text, format)
        }
        None => parse_showcase(EMBEDDED_SHOWCASE, DataFormat::Toml),
    }
}
