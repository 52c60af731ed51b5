//! Error taxonomy for the collection pipeline.
//!
//! Per-URL failures ([`FetchError`], [`ExtractionIncomplete`]) are always
//! recovered by the source driver: the URL is logged and skipped. Only
//! [`ConfigError`] and [`PersistenceError`] ever leave a driver, and even those
//! abort a single source rather than the whole run.

use std::path::PathBuf;
use thiserror::Error;

/// A page could not be retrieved.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Connection failure, timeout, or body decoding error.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },
}

/// The article page did not yield both a title and a body.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("extraction incomplete (title missing: {missing_title}, content missing: {missing_content})")]
pub struct ExtractionIncomplete {
    pub missing_title: bool,
    pub missing_content: bool,
}

/// Malformed run configuration or site profile.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("profile `{profile}`: invalid CSS selector `{selector}`: {reason}")]
    Selector {
        profile: String,
        selector: String,
        reason: String,
    },
    #[error("profile `{profile}`: invalid URL `{url}`: {source}")]
    Url {
        profile: String,
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("profile `{profile}`: category `{category}` is declared twice")]
    DuplicateCategory { profile: String, category: String },
    #[error("profile `{profile}`: delay range {min}..={max} seconds is invalid")]
    DelayRange { profile: String, min: f64, max: f64 },
    #[error("profile `{profile}`: sub-category limit {limit} is outside 1..={max}")]
    SubcategoryLimit { profile: String, limit: usize, max: usize },
    #[error("target per category must be at least 1")]
    ZeroTarget,
    #[error("unknown source `{0}`")]
    UnknownSource(String),
    #[error("cannot read profiles from {path}: {source}")]
    ProfileFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed profiles in {path}: {source}")]
    ProfileYaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Writing a dataset or report to disk failed.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error on {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("cannot serialise summary: {0}")]
    Json(#[from] serde_json::Error),
}
