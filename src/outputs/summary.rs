//! Record counts of a dataset, by source and by category.

use crate::error::PersistenceError;
use crate::models::ArticleRecord;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// File name of the JSON summary written next to the combined dataset.
pub const SUMMARY_FILE: &str = "collection_summary.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    pub total: usize,
    pub by_source: BTreeMap<String, usize>,
    pub by_category: BTreeMap<String, usize>,
}

impl DatasetSummary {
    pub fn from_records(records: &[ArticleRecord]) -> Self {
        let mut summary = Self {
            total: records.len(),
            ..Self::default()
        };
        for record in records {
            *summary.by_source.entry(record.source.clone()).or_default() += 1;
            *summary.by_category.entry(record.category.clone()).or_default() += 1;
        }
        summary
    }

    /// One log line per source and per category.
    pub fn log(&self) {
        info!(total = self.total, "Dataset distribution");
        for (source, count) in &self.by_source {
            info!(%source, count, "Records by source");
        }
        for (category, count) in &self.by_category {
            info!(%category, count, "Records by category");
        }
    }
}

#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_summary(summary: &DatasetSummary, path: &Path) -> Result<(), PersistenceError> {
    let json = serde_json::to_string_pretty(summary)?;
    fs::write(path, json)
        .await
        .map_err(|source| PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    info!("Wrote summary");
    Ok(())
}
