//! Generic source driver.
//!
//! Runs one [`SiteProfile`] category by category, in map order:
//!
//! 1. fetch the listing page (or pages, when the profile paginates)
//! 2. extract candidate article links
//! 3. fetch and extract articles until the per-category target is reached
//! 4. if still below target, crawl up to `limit` sub-category listings the
//!    same way (one level only)
//!
//! Every fetch and extraction failure is logged and skipped. A category whose
//! listing cannot be fetched yields nothing and the driver moves on.

use super::article::ArticleExtractor;
use super::links::LinkExtractor;
use super::profile::{Category, SiteProfile};
use crate::error::{ConfigError, ExtractionIncomplete, FetchError};
use crate::fetch::{Fetcher, PageKind, Throttled};
use crate::models::{ArticleRecord, CategoryReport, RunResult, StopReason};
use crate::utils::{truncate_for_log, upcase};
use chrono::NaiveDate;
use scraper::Html;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// Run-wide knobs shared by every driver.
#[derive(Debug, Clone, Copy)]
pub struct DriverOptions {
    pub target_per_category: usize,
    /// Stamped on every record as its collection date.
    pub collected_on: NaiveDate,
}

/// Why a single article URL produced no record.
#[derive(Error, Debug)]
enum ArticleError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Incomplete(#[from] ExtractionIncomplete),
}

/// Mutable state of one driver invocation. Never shared between drivers.
#[derive(Debug, Default)]
struct CrawlState {
    /// Article URLs already attempted, successful or not.
    visited: HashSet<String>,
    /// Listing URLs already crawled.
    listings: HashSet<String>,
    records: Vec<ArticleRecord>,
}

/// Crawls one news source described by a [`SiteProfile`].
pub struct SourceDriver<'a, F: Fetcher> {
    profile: &'a SiteProfile,
    fetcher: Throttled<&'a F>,
    links: LinkExtractor,
    articles: ArticleExtractor,
    options: DriverOptions,
}

impl<'a, F: Fetcher> SourceDriver<'a, F> {
    /// Validate and compile `profile`.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] for a zero target, invalid URLs, duplicate categories,
    /// bad delay ranges or unparsable selectors.
    pub fn new(profile: &'a SiteProfile, fetcher: &'a F, options: DriverOptions) -> Result<Self, ConfigError> {
        if options.target_per_category == 0 {
            return Err(ConfigError::ZeroTarget);
        }
        profile.validate()?;
        Ok(Self {
            profile,
            fetcher: Throttled::new(fetcher, profile.listing_delay, profile.article_delay),
            links: LinkExtractor::new(profile)?,
            articles: ArticleExtractor::new(profile)?,
            options,
        })
    }

    /// Crawl every category of the profile.
    #[instrument(level = "info", skip(self), fields(source = %self.profile.name))]
    pub async fn run(&self) -> RunResult {
        let mut state = CrawlState::default();
        let mut reports = Vec::with_capacity(self.profile.categories.len());

        for category in &self.profile.categories {
            info!(category = %category.name, "{} category: collecting articles", upcase(&category.name));
            let report = self.collect_category(category, &mut state).await;
            info!(
                category = %report.category,
                count = report.collected,
                stop = ?report.stop,
                "Category finished"
            );
            reports.push(report);
        }

        info!(count = state.records.len(), "Source finished");
        let mut result = RunResult::new(&self.profile.name);
        result.records = state.records;
        result.categories = reports;
        result
    }

    #[instrument(level = "info", skip_all, fields(category = %category.name))]
    async fn collect_category(&self, category: &Category, state: &mut CrawlState) -> CategoryReport {
        let mut count = 0;
        let listing_urls = self.listing_urls(category);
        let mut root_body = None;
        let mut any_listing = false;

        for (page, url) in listing_urls.iter().enumerate() {
            if count >= self.options.target_per_category {
                break;
            }
            state.listings.insert(url.clone());
            info!(%url, page = page + 1, "Inspecting listing page");
            let body = match self.fetcher.fetch_page(PageKind::Listing, url).await {
                Ok(body) => body,
                Err(e) => {
                    warn!(%url, error = %e, "Listing page unavailable; skipping");
                    continue;
                }
            };
            any_listing = true;
            let candidates = {
                let document = Html::parse_document(&body);
                self.links.article_links(&document, &category.name, &state.visited)
            };
            info!(%url, count = candidates.len(), "Found candidate article links");
            if page == 0 {
                root_body = Some(body);
            }
            self.harvest(category, candidates, state, &mut count).await;
        }

        if !any_listing {
            return self.report(category, count, Some(StopReason::ListingFailed));
        }

        if count < self.options.target_per_category {
            if let Some(body) = root_body {
                self.subcategory_fallback(category, &body, state, &mut count)
                    .await;
            }
        }

        self.report(category, count, None)
    }

    /// One URL per listing page: the bare category URL, or every page number
    /// up to the pagination limit.
    fn listing_urls(&self, category: &Category) -> Vec<String> {
        let Some(pagination) = &self.profile.pagination else {
            return vec![category.url.clone()];
        };
        (1..=pagination.max_pages.max(1))
            .filter_map(|page| match pagination.page_url(&category.url, page) {
                Ok(url) => Some(url),
                Err(e) => {
                    warn!(url = %category.url, page, error = %e, "Cannot build page URL");
                    None
                }
            })
            .collect()
    }

    #[instrument(level = "info", skip_all, fields(category = %category.name))]
    async fn subcategory_fallback(
        &self,
        category: &Category,
        root_body: &str,
        state: &mut CrawlState,
        count: &mut usize,
    ) {
        let subcategories = {
            let document = Html::parse_document(root_body);
            self.links
                .subcategory_links(&document, category, &state.listings)
        };
        if subcategories.is_empty() {
            debug!("No sub-category listings to fall back on");
            return;
        }
        info!(
            collected = *count,
            subcategories = subcategories.len(),
            "Below target; checking sub-categories"
        );

        for url in subcategories {
            if *count >= self.options.target_per_category {
                break;
            }
            if !state.listings.insert(url.clone()) {
                continue;
            }
            info!(%url, "Inspecting sub-category listing");
            let body = match self.fetcher.fetch_page(PageKind::Listing, &url).await {
                Ok(body) => body,
                Err(e) => {
                    warn!(%url, error = %e, "Sub-category listing unavailable; skipping");
                    continue;
                }
            };
            let candidates = {
                let document = Html::parse_document(&body);
                self.links
                    .subcategory_article_links(&document, &category.name, &state.visited)
            };
            info!(%url, count = candidates.len(), "Found candidate article links in sub-category");
            self.harvest(category, candidates, state, count).await;
        }
    }

    /// Fetch candidates in order until the target is reached or they run out.
    async fn harvest(&self, category: &Category, candidates: Vec<String>, state: &mut CrawlState, count: &mut usize) {
        let target = self.options.target_per_category;
        for url in candidates {
            if *count >= target {
                break;
            }
            if !state.visited.insert(url.clone()) {
                continue;
            }
            match self.fetch_article(category, &url).await {
                Ok(record) => {
                    *count += 1;
                    info!(
                        %url,
                        title = %truncate_for_log(&record.title, 50),
                        "Article added ({}: {}/{})",
                        category.name,
                        *count,
                        target
                    );
                    state.records.push(record);
                }
                Err(ArticleError::Incomplete(e)) => {
                    warn!(%url, error = %e, "Title or content not found; skipping");
                }
                Err(ArticleError::Fetch(e)) => {
                    warn!(%url, error = %e, "Article fetch failed; skipping");
                }
            }
        }
    }

    async fn fetch_article(&self, category: &Category, url: &str) -> Result<ArticleRecord, ArticleError> {
        let body = self.fetcher.fetch_page(PageKind::Article, url).await?;
        let extracted = self.articles.extract(&body)?;
        Ok(ArticleRecord {
            category: category.name.clone(),
            title: extracted.title,
            content: extracted.content,
            url: url.to_string(),
            source: self.profile.name.clone(),
            date: self.options.collected_on,
        })
    }

    fn report(&self, category: &Category, collected: usize, stop: Option<StopReason>) -> CategoryReport {
        let stop = stop.unwrap_or(if collected >= self.options.target_per_category {
            StopReason::TargetReached
        } else {
            StopReason::Exhausted
        });
        CategoryReport {
            category: category.name.clone(),
            collected,
            stop,
        }
    }
}
