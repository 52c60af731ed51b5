//! Data models for collected articles and per-run bookkeeping.
//!
//! - [`ArticleRecord`]: one row of the output dataset
//! - [`CategoryReport`] / [`StopReason`]: why a category stopped collecting
//! - [`RunResult`]: everything one source driver produced

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single collected news article.
///
/// Field order is the column order of the CSV datasets:
/// `category, title, content, url, source, date`.
///
/// Records are only built from extractions where both `title` and `content`
/// are non-empty after whitespace normalisation, and are never mutated after
/// creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// Category name from the source's category map (e.g. `"ekonomi"`).
    pub category: String,
    /// Article headline.
    pub title: String,
    /// Article body text, whitespace collapsed.
    pub content: String,
    /// Absolute article URL, unique within one driver run.
    pub url: String,
    /// Identifier of the source that produced the record (e.g. `"cnnturk"`).
    #[serde(default)]
    pub source: String,
    /// Day of collection, not of publication.
    pub date: NaiveDate,
}

/// Why a category stopped collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The per-category target count was reached.
    TargetReached,
    /// Link and sub-category pools ran out before the target.
    Exhausted,
    /// The category's own listing page could not be fetched.
    ListingFailed,
}

/// Outcome of one category within a driver run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryReport {
    pub category: String,
    pub collected: usize,
    pub stop: StopReason,
}

/// The records produced by one source driver, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct RunResult {
    pub source: String,
    pub records: Vec<ArticleRecord>,
    pub categories: Vec<CategoryReport>,
}

impl RunResult {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}
