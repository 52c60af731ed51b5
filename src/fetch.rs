//! Rate-limited page fetching.
//!
//! # Architecture
//!
//! - [`Fetcher`]: core trait, `fetch(url) -> body`
//! - [`HttpFetcher`]: `reqwest` implementation with a fixed browser User-Agent
//! - [`Throttled`]: decorator that sleeps a random, page-kind specific delay
//!   before delegating to any [`Fetcher`]
//!
//! There are no retries. A failed fetch is reported to the caller, which logs
//! it and skips the URL.

use crate::error::FetchError;
use rand::{Rng, rng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, instrument};

/// Browser identification sent with every request.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Trait for retrieving a page body.
///
/// Implementors return the decoded document text, or a [`FetchError`] on
/// transport failure, timeout, or non-2xx status.
pub trait Fetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

impl<F: Fetcher> Fetcher for &F {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        (**self).fetch(url).await
    }
}

/// HTTP GET through a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a client with the fixed [`USER_AGENT`] and a per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let t0 = Instant::now();
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(body)
    }
}

/// Closed interval of seconds from which a politeness delay is drawn uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min_secs: f64,
    pub max_secs: f64,
}

impl DelayRange {
    /// Delay before a category or sub-category listing request.
    pub const LISTING: DelayRange = DelayRange::new(1.0, 2.0);
    /// Delay before an article page request.
    pub const ARTICLE: DelayRange = DelayRange::new(0.2, 0.5);
    pub const NONE: DelayRange = DelayRange::new(0.0, 0.0);

    pub const fn new(min_secs: f64, max_secs: f64) -> Self {
        Self { min_secs, max_secs }
    }

    /// Both bounds finite, non-negative and ordered.
    pub fn is_valid(&self) -> bool {
        self.min_secs.is_finite()
            && self.max_secs.is_finite()
            && self.min_secs >= 0.0
            && self.min_secs <= self.max_secs
    }

    /// Draw a delay. Invalid ranges yield zero.
    pub fn sample(&self) -> Duration {
        if !self.is_valid() || self.max_secs == 0.0 {
            return Duration::ZERO;
        }
        let secs = rng().random_range(self.min_secs..=self.max_secs);
        Duration::from_secs_f64(secs)
    }
}

/// Which kind of page is about to be requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Listing,
    Article,
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageKind::Listing => f.write_str("listing"),
            PageKind::Article => f.write_str("article"),
        }
    }
}

/// Wrapper that adds the politeness throttle to any [`Fetcher`].
///
/// Every request waits a random delay drawn from the range matching its
/// [`PageKind`]. Requests are never issued concurrently by the drivers, so the
/// delay is the effective spacing between consecutive requests.
pub struct Throttled<T> {
    inner: T,
    listing: DelayRange,
    article: DelayRange,
}

impl<T> Throttled<T>
where
    T: Fetcher,
{
    pub fn new(inner: T, listing: DelayRange, article: DelayRange) -> Self {
        Self {
            inner,
            listing,
            article,
        }
    }

    /// Sleep for the page kind's delay, then fetch.
    #[instrument(level = "debug", skip(self))]
    pub async fn fetch_page(&self, kind: PageKind, url: &str) -> Result<String, FetchError> {
        let range = match kind {
            PageKind::Listing => self.listing,
            PageKind::Article => self.article,
        };
        let delay = range.sample();
        if !delay.is_zero() {
            sleep(delay).await;
        }
        let res = self.inner.fetch(url).await;
        if let Err(e) = &res {
            debug!(%kind, %url, error = %e, "Fetch failed");
        }
        res
    }
}

impl<T> fmt::Debug for Throttled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Throttled")
            .field("listing", &self.listing)
            .field("article", &self.article)
            .finish()
    }
}
