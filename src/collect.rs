//! Collection orchestration.
//!
//! [`collect_all`] runs each source driver in order, persists each source's
//! dataset as soon as that source finishes, then concatenates every persisted
//! result into the combined dataset. [`combine_existing`] rebuilds the
//! combined dataset from per-source files already on disk.
//!
//! Configuration errors and per-source write failures only drop that
//! source's contribution. Failing to write the combined dataset is fatal.

use crate::error::PersistenceError;
use crate::fetch::Fetcher;
use crate::models::{ArticleRecord, StopReason};
use crate::outputs::dataset::{self, COMBINED_FILE};
use crate::outputs::summary::{self, DatasetSummary, SUMMARY_FILE};
use crate::scrapers::driver::{DriverOptions, SourceDriver};
use crate::scrapers::profile::SiteProfile;
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument, warn};

/// Where datasets are written under the data directory.
#[derive(Debug, Clone)]
pub struct Layout {
    pub raw_dir: PathBuf,
    pub processed_dir: PathBuf,
}

impl Layout {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            raw_dir: data_dir.join("raw"),
            processed_dir: data_dir.join("processed"),
        }
    }

    pub fn source_dataset(&self, profile: &SiteProfile) -> PathBuf {
        self.raw_dir.join(profile.dataset_file_name())
    }

    pub fn combined_dataset(&self) -> PathBuf {
        self.processed_dir.join(COMBINED_FILE)
    }

    pub fn summary(&self) -> PathBuf {
        self.processed_dir.join(SUMMARY_FILE)
    }
}

/// What a collection run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionReport {
    /// Sources whose dataset was written, with their record counts.
    pub persisted: Vec<(String, usize)>,
    /// Sources that produced nothing or could not be configured or persisted.
    pub failed: Vec<String>,
    /// Rows in the combined dataset.
    pub total: usize,
}

/// Crawl every profile in order and write per-source and combined datasets.
///
/// # Errors
///
/// Only a failure to write the combined dataset is returned; everything else
/// is logged and reflected in the [`CollectionReport`].
#[instrument(level = "info", skip_all, fields(sources = profiles.len(), target = options.target_per_category))]
pub async fn collect_all<F: Fetcher>(
    profiles: &[SiteProfile],
    fetcher: &F,
    options: DriverOptions,
    layout: &Layout,
) -> Result<CollectionReport, PersistenceError> {
    let mut report = CollectionReport::default();
    let mut combined: Vec<ArticleRecord> = Vec::new();

    for (i, profile) in profiles.iter().enumerate() {
        info!(step = i + 1, source = %profile.name, "Collecting from source");
        let driver = match SourceDriver::new(profile, fetcher, options) {
            Ok(driver) => driver,
            Err(e) => {
                error!(source = %profile.name, error = %e, "Invalid site profile; skipping source");
                report.failed.push(profile.name.clone());
                continue;
            }
        };

        let result = driver.run().await;
        let short = result
            .categories
            .iter()
            .filter(|c| c.stop != StopReason::TargetReached)
            .map(|c| format!("{}={}", c.category, c.collected))
            .collect::<Vec<_>>();
        if !short.is_empty() {
            warn!(source = %result.source, categories = ?short, "Categories below target");
        }
        if result.is_empty() {
            warn!(source = %profile.name, "No articles collected from source");
            report.failed.push(profile.name.clone());
            continue;
        }

        let path = layout.source_dataset(profile);
        if let Err(e) = dataset::write_dataset(&result.records, &path).await {
            error!(source = %profile.name, error = %e, "Failed to persist source dataset; dropping its records");
            report.failed.push(profile.name.clone());
            continue;
        }
        info!(source = %profile.name, count = result.len(), path = %path.display(), "Source dataset saved");
        report.persisted.push((profile.name.clone(), result.len()));
        combined.extend(result.records);
    }

    report.total = persist_combined(&combined, layout).await?;
    Ok(report)
}

/// Concatenate every per-source dataset found in the raw directory.
///
/// Unreadable files are logged and skipped. Returns the combined row count.
#[instrument(level = "info", skip_all, fields(raw_dir = %layout.raw_dir.display()))]
pub async fn combine_existing(layout: &Layout) -> Result<usize, PersistenceError> {
    let files = dataset::discover_datasets(&layout.raw_dir).await?;
    info!(count = files.len(), "Found source datasets");

    let mut combined = Vec::new();
    for (source, path) in files {
        match dataset::read_dataset(&path, &source).await {
            Ok(records) => {
                info!(%source, count = records.len(), "Read source dataset");
                combined.extend(records);
            }
            Err(e) => warn!(%source, error = %e, "Cannot read source dataset; skipping"),
        }
    }

    persist_combined(&combined, layout).await
}

async fn persist_combined(combined: &[ArticleRecord], layout: &Layout) -> Result<usize, PersistenceError> {
    if combined.is_empty() {
        error!("No data could be collected from any source");
        return Ok(0);
    }

    let path = layout.combined_dataset();
    dataset::write_dataset(combined, &path).await?;
    info!(count = combined.len(), path = %path.display(), "Combined dataset saved");

    let stats = DatasetSummary::from_records(combined);
    stats.log();
    if let Err(e) = summary::write_summary(&stats, &layout.summary()).await {
        warn!(error = %e, "Failed to write dataset summary");
    }
    Ok(combined.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::DelayRange;
    use crate::fetch::testing::StaticSite;
    use crate::scrapers::profile::{Category, LinkRule, LinkSource, TitleStrategy};
    use crate::utils::ensure_writable_dir;
    use chrono::NaiveDate;

    fn profile(name: &str) -> SiteProfile {
        SiteProfile {
            name: name.to_string(),
            origin: format!("https://{name}.test"),
            categories: vec![Category::new("ekonomi", &format!("https://{name}.test/ekonomi"))],
            title: vec![TitleStrategy::Meta("og:title".to_string())],
            content_containers: vec![],
            content_blocks: "p".to_string(),
            min_content_chars: None,
            links: vec![LinkSource::new("a[href]", LinkRule::default())],
            fallback_links: vec![],
            subcategory_links: vec![],
            subcategories: None,
            pagination: None,
            listing_delay: DelayRange::NONE,
            article_delay: DelayRange::NONE,
        }
    }

    fn og_page(title: &str) -> String {
        format!(
            r#"<html><head><meta property="og:title" content="{title}">
               <meta property="og:description" content="{title} açıklaması"></head></html>"#
        )
    }

    /// A site for `name` whose ekonomi listing links to `n` articles.
    fn add_source(mut site: StaticSite, name: &str, n: usize) -> StaticSite {
        let anchors: String = (0..n).map(|i| format!(r#"<a href="/haber/{i}">{i}</a>"#)).collect();
        site = site.page(&format!("https://{name}.test/ekonomi"), anchors);
        for i in 0..n {
            site = site.page(&format!("https://{name}.test/haber/{i}"), og_page(&format!("{name} {i}")));
        }
        site
    }

    fn options() -> DriverOptions {
        DriverOptions {
            target_per_category: 10,
            collected_on: NaiveDate::from_ymd_opt(2025, 5, 6).unwrap(),
        }
    }

    async fn layout(tmp: &tempfile::TempDir) -> Layout {
        let layout = Layout::new(tmp.path());
        ensure_writable_dir(&layout.raw_dir).await.unwrap();
        ensure_writable_dir(&layout.processed_dir).await.unwrap();
        layout
    }

    #[tokio::test]
    async fn test_combined_row_count_is_sum_of_sources() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = layout(&tmp).await;
        let site = add_source(add_source(StaticSite::new(), "alfa", 3), "beta", 2);
        let profiles = vec![profile("alfa"), profile("beta")];

        let report = collect_all(&profiles, &site, options(), &layout).await.unwrap();

        assert_eq!(report.persisted, vec![("alfa".to_string(), 3), ("beta".to_string(), 2)]);
        assert_eq!(report.total, 5);

        let combined = dataset::read_dataset(&layout.combined_dataset(), "").await.unwrap();
        assert_eq!(combined.len(), 5);
        let stats = DatasetSummary::from_records(&combined);
        assert_eq!(stats.by_source["alfa"], 3);
        assert_eq!(stats.by_source["beta"], 2);

        let alfa = dataset::read_dataset(&layout.raw_dir.join("alfa_news_dataset.csv"), "")
            .await
            .unwrap();
        assert_eq!(alfa.len(), 3);
        assert!(layout.summary().exists());
    }

    #[tokio::test]
    async fn test_failed_source_does_not_block_others() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = layout(&tmp).await;
        // "bos" has no pages at all, "kotu" has an invalid selector
        let site = add_source(StaticSite::new(), "iyi", 2);
        let mut broken = profile("kotu");
        broken.content_containers.push("p[".to_string());
        let profiles = vec![profile("bos"), broken, profile("iyi")];

        let report = collect_all(&profiles, &site, options(), &layout).await.unwrap();

        assert_eq!(report.failed, vec!["bos".to_string(), "kotu".to_string()]);
        assert_eq!(report.persisted, vec![("iyi".to_string(), 2)]);
        assert!(!layout.raw_dir.join("bos_news_dataset.csv").exists());
    }

    #[tokio::test]
    async fn test_all_sources_empty_reports_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = layout(&tmp).await;
        let site = StaticSite::new();
        let report = collect_all(&[profile("bos")], &site, options(), &layout)
            .await
            .unwrap();
        assert_eq!(report.total, 0);
        assert!(!layout.combined_dataset().exists());
    }

    #[tokio::test]
    async fn test_combine_existing_concatenates_raw_files() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = layout(&tmp).await;
        let site = add_source(add_source(StaticSite::new(), "alfa", 2), "beta", 1);
        collect_all(&[profile("alfa"), profile("beta")], &site, options(), &layout)
            .await
            .unwrap();
        tokio::fs::remove_file(layout.combined_dataset()).await.unwrap();
        tokio::fs::write(layout.raw_dir.join("bozuk_news_dataset.csv"), "category,title\n\"unterminated")
            .await
            .unwrap();

        let total = combine_existing(&layout).await.unwrap();

        assert_eq!(total, 3);
        assert!(layout.combined_dataset().exists());
    }
}
