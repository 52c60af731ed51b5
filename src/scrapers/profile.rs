//! Per-source site profiles.
//!
//! A [`SiteProfile`] carries everything that differs between news sites:
//! the category map, the link qualification rules, the title and content
//! extraction cascades, and optional pagination and sub-category fallback.
//! One generic [`SourceDriver`](super::driver::SourceDriver) runs any profile.
//!
//! Profiles are plain data and deserialize from YAML, so the built-in set can
//! be replaced with `--profiles <FILE>`:
//!
//! ```yaml
//! - name: example
//!   origin: https://www.example.com
//!   categories:
//!     - { name: ekonomi, url: "https://www.example.com/ekonomi" }
//!   title:
//!     - meta: og:title
//!     - selector: h1
//!   content_containers: [".article-body", "article"]
//!   links:
//!     - selector: "a[href]"
//!       rule: { include_any: ["/haber/"] }
//! ```

use crate::error::ConfigError;
use crate::fetch::DelayRange;
use scraper::Selector;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use url::Url;

/// Block-level elements whose text makes up an article body.
pub const DEFAULT_CONTENT_BLOCKS: &str = "p, h2, h3, h4, li, blockquote";

/// Upper bound, and default, on sub-category listings explored per category.
pub const DEFAULT_SUBCATEGORY_LIMIT: usize = 5;

/// Everything a driver needs to crawl one news source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteProfile {
    /// Source identifier, written to every record and used in file names.
    pub name: String,
    /// Scheme and host that root-relative links are resolved against.
    pub origin: String,
    /// Category name to listing URL, crawled in declaration order.
    pub categories: Vec<Category>,
    /// Title cascade, first non-empty result wins.
    pub title: Vec<TitleStrategy>,
    /// Content container candidates; the first one present on the page is used.
    pub content_containers: Vec<String>,
    #[serde(default = "default_content_blocks")]
    pub content_blocks: String,
    /// Replace bodies shorter than this with the Open-Graph description.
    #[serde(default)]
    pub min_content_chars: Option<usize>,
    /// Where article links come from on a listing page.
    pub links: Vec<LinkSource>,
    /// Consulted only when `links` yields nothing.
    #[serde(default)]
    pub fallback_links: Vec<LinkSource>,
    /// Link sources for sub-category listing pages. Empty means `links`.
    #[serde(default)]
    pub subcategory_links: Vec<LinkSource>,
    #[serde(default)]
    pub subcategories: Option<SubcategoryRule>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(default = "default_listing_delay")]
    pub listing_delay: DelayRange,
    #[serde(default = "default_article_delay")]
    pub article_delay: DelayRange,
}

/// One entry of a source's category map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub url: String,
}

impl Category {
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
        }
    }
}

/// A single step of the title cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleStrategy {
    /// `content` of `<meta property="...">`.
    Meta(String),
    /// Text of the first element matching a CSS selector.
    Selector(String),
}

/// A CSS selector for candidate anchors plus the rule their `href` must pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSource {
    pub selector: String,
    #[serde(default)]
    pub rule: LinkRule,
}

impl LinkSource {
    pub fn new(selector: &str, rule: LinkRule) -> Self {
        Self {
            selector: selector.to_string(),
            rule,
        }
    }
}

/// Qualification predicate over a raw `href`.
///
/// All configured conditions must hold. The default rule accepts everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkRule {
    /// Only `/path` style links (not `//host/...`).
    pub root_relative_only: bool,
    /// At least one of these substrings must occur; empty means no constraint.
    pub include_any: Vec<String>,
    pub exclude_prefixes: Vec<String>,
    /// Minimum number of `/`-separated parts, so `/a/b` has 3.
    pub min_segments: usize,
    /// Reject `/<category>/...` links, which point at section pages.
    pub exclude_category_prefix: bool,
}

/// How sibling or sub-category listings are recognised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubcategoryRule {
    pub matcher: SubcategoryMatch,
    #[serde(default)]
    pub root_relative_only: bool,
    #[serde(default = "default_subcategory_limit")]
    pub limit: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubcategoryMatch {
    /// The href contains the category token anywhere.
    Contains,
    /// The href starts with `/<category>/`.
    Prefix,
}

/// Explicit page-number traversal of a category listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub max_pages: u32,
    #[serde(default = "default_page_param")]
    pub query_param: String,
}

impl Pagination {
    /// URL of page `page` (1-based). Page 1 is the bare listing URL.
    pub fn page_url(&self, base: &str, page: u32) -> Result<String, url::ParseError> {
        if page <= 1 {
            return Ok(base.to_string());
        }
        let mut url = Url::parse(base)?;
        url.query_pairs_mut()
            .append_pair(&self.query_param, &page.to_string());
        Ok(url.to_string())
    }
}

fn default_content_blocks() -> String {
    DEFAULT_CONTENT_BLOCKS.to_string()
}

fn default_listing_delay() -> DelayRange {
    DelayRange::LISTING
}

fn default_article_delay() -> DelayRange {
    DelayRange::ARTICLE
}

fn default_subcategory_limit() -> usize {
    DEFAULT_SUBCATEGORY_LIMIT
}

fn default_page_param() -> String {
    "page".to_string()
}

impl SiteProfile {
    /// Check URLs, category uniqueness, delay ranges and the sub-category limit.
    ///
    /// Selectors are checked when the extractors compile them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.origin_url()?;
        let mut names = HashSet::new();
        for category in &self.categories {
            Url::parse(&category.url).map_err(|source| ConfigError::Url {
                profile: self.name.clone(),
                url: category.url.clone(),
                source,
            })?;
            if !names.insert(category.name.as_str()) {
                return Err(ConfigError::DuplicateCategory {
                    profile: self.name.clone(),
                    category: category.name.clone(),
                });
            }
        }
        for range in [self.listing_delay, self.article_delay] {
            if !range.is_valid() {
                return Err(ConfigError::DelayRange {
                    profile: self.name.clone(),
                    min: range.min_secs,
                    max: range.max_secs,
                });
            }
        }
        if let Some(rule) = &self.subcategories {
            if !(1..=DEFAULT_SUBCATEGORY_LIMIT).contains(&rule.limit) {
                return Err(ConfigError::SubcategoryLimit {
                    profile: self.name.clone(),
                    limit: rule.limit,
                    max: DEFAULT_SUBCATEGORY_LIMIT,
                });
            }
        }
        Ok(())
    }

    pub fn origin_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.origin).map_err(|source| ConfigError::Url {
            profile: self.name.clone(),
            url: self.origin.clone(),
            source,
        })
    }

    /// Parse one of this profile's CSS selectors.
    pub fn selector(&self, css: &str) -> Result<Selector, ConfigError> {
        Selector::parse(css).map_err(|e| ConfigError::Selector {
            profile: self.name.clone(),
            selector: css.to_string(),
            reason: e.to_string(),
        })
    }

    /// Default file name of this source's dataset.
    pub fn dataset_file_name(&self) -> String {
        format!("{}_news_dataset.csv", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> SiteProfile {
        SiteProfile {
            name: "ornek".to_string(),
            origin: "https://www.ornek.com".to_string(),
            categories: vec![
                Category::new("dunya", "https://www.ornek.com/dunya"),
                Category::new("spor", "https://www.ornek.com/spor"),
            ],
            title: vec![TitleStrategy::Meta("og:title".to_string())],
            content_containers: vec!["article".to_string()],
            content_blocks: default_content_blocks(),
            min_content_chars: None,
            links: vec![LinkSource::new("a[href]", LinkRule::default())],
            fallback_links: vec![],
            subcategory_links: vec![],
            subcategories: None,
            pagination: None,
            listing_delay: DelayRange::LISTING,
            article_delay: DelayRange::ARTICLE,
        }
    }

    #[test]
    fn test_validate_accepts_minimal_profile() {
        assert!(minimal().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicate_category() {
        let mut profile = minimal();
        profile
            .categories
            .push(Category::new("spor", "https://www.ornek.com/spor-2"));
        let err = profile.validate().unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateCategory { ref category, .. } if category == "spor"));
    }

    #[test]
    fn test_validate_rejects_bad_urls_and_delays() {
        let mut profile = minimal();
        profile.origin = "not a url".to_string();
        assert!(matches!(profile.validate(), Err(ConfigError::Url { .. })));

        let mut profile = minimal();
        profile.article_delay = DelayRange::new(1.0, 0.5);
        assert!(matches!(profile.validate(), Err(ConfigError::DelayRange { .. })));
    }

    #[test]
    fn test_validate_bounds_subcategory_limit() {
        let with_limit = |limit| {
            let mut profile = minimal();
            profile.subcategories = Some(SubcategoryRule {
                matcher: SubcategoryMatch::Prefix,
                root_relative_only: false,
                limit,
            });
            profile.validate()
        };
        assert!(with_limit(1).is_ok());
        assert!(with_limit(DEFAULT_SUBCATEGORY_LIMIT).is_ok());
        assert!(matches!(
            with_limit(50),
            Err(ConfigError::SubcategoryLimit { limit: 50, max: 5, .. })
        ));
        assert!(matches!(with_limit(0), Err(ConfigError::SubcategoryLimit { limit: 0, .. })));
    }

    #[test]
    fn test_selector_error_is_config_error() {
        let err = minimal().selector("div[").unwrap_err();
        assert!(matches!(err, ConfigError::Selector { ref selector, .. } if selector == "div["));
    }

    #[test]
    fn test_page_url() {
        let pagination = Pagination {
            max_pages: 20,
            query_param: "page".to_string(),
        };
        let base = "https://www.ntv.com.tr/ekonomi";
        assert_eq!(pagination.page_url(base, 1).unwrap(), base);
        assert_eq!(
            pagination.page_url(base, 3).unwrap(),
            "https://www.ntv.com.tr/ekonomi?page=3"
        );
    }

    #[test]
    fn test_profile_from_yaml_applies_defaults() {
        let yaml = r#"
name: ornek
origin: https://www.ornek.com
categories:
  - { name: ekonomi, url: "https://www.ornek.com/ekonomi" }
title:
  - meta: og:title
  - selector: h1
content_containers: [".article-body"]
links:
  - selector: "a[href]"
    rule: { include_any: ["/haber/"] }
subcategories:
  matcher: prefix
"#;
        let profile: SiteProfile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(profile.content_blocks, DEFAULT_CONTENT_BLOCKS);
        assert_eq!(profile.listing_delay, DelayRange::LISTING);
        assert_eq!(profile.article_delay, DelayRange::ARTICLE);
        assert_eq!(profile.title[1], TitleStrategy::Selector("h1".to_string()));
        assert_eq!(profile.links[0].rule.include_any, vec!["/haber/".to_string()]);
        assert!(!profile.links[0].rule.root_relative_only);
        let sub = profile.subcategories.as_ref().unwrap();
        assert_eq!(sub.matcher, SubcategoryMatch::Prefix);
        assert_eq!(sub.limit, DEFAULT_SUBCATEGORY_LIMIT);
        assert!(profile.subcategory_links.is_empty());
        assert!(profile.pagination.is_none());
        assert_eq!(profile.dataset_file_name(), "ornek_news_dataset.csv");
    }
}
