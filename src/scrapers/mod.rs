//! News source crawling.
//!
//! All sources are crawled by one generic [`driver::SourceDriver`]; what
//! differs between sites is captured in a [`profile::SiteProfile`].
//!
//! # Supported Sources
//!
//! | Source | Module | Listing traversal | Notes |
//! |--------|--------|-------------------|-------|
//! | CNN Türk | [`cnnturk`] | single page + sub-categories | `/haber/` and `/video/` links |
//! | NTV | [`ntv`] | `?page=1..20` | card widgets, short bodies use `og:description` |
//! | Habertürk | [`haberturk`] | single page + sub-categories | generic anchors plus news widgets |
//!
//! # Building Blocks
//!
//! - [`links`]: listing page → candidate article URLs
//! - [`article`]: article page → title and body through extraction cascades
//! - [`driver`]: per-category state machine with target cap and fallbacks

pub mod article;
pub mod cnnturk;
pub mod driver;
pub mod haberturk;
pub mod links;
pub mod ntv;
pub mod profile;

use crate::error::ConfigError;
use profile::SiteProfile;
use std::path::Path;
use tracing::{info, instrument};

/// Built-in profiles in crawl order.
pub fn builtin() -> Vec<SiteProfile> {
    vec![cnnturk::profile(), ntv::profile(), haberturk::profile()]
}

/// Read a YAML list of profiles, replacing the built-in set.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn load_profiles(path: &Path) -> Result<Vec<SiteProfile>, ConfigError> {
    let yaml = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::ProfileFile {
            path: path.to_path_buf(),
            source,
        })?;
    let profiles: Vec<SiteProfile> =
        serde_yaml::from_str(&yaml).map_err(|source| ConfigError::ProfileYaml {
            path: path.to_path_buf(),
            source,
        })?;
    info!(count = profiles.len(), "Loaded site profiles");
    Ok(profiles)
}

/// Keep only the named profiles, preserving their original order.
///
/// An empty `names` list keeps everything.
pub fn select(profiles: Vec<SiteProfile>, names: &[String]) -> Result<Vec<SiteProfile>, ConfigError> {
    if let Some(unknown) = names
        .iter()
        .find(|name| !profiles.iter().any(|p| &p.name == *name))
    {
        return Err(ConfigError::UnknownSource(unknown.clone()));
    }
    if names.is_empty() {
        return Ok(profiles);
    }
    Ok(profiles
        .into_iter()
        .filter(|p| names.contains(&p.name))
        .collect())
}
