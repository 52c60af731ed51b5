//! Article link discovery on listing pages.
//!
//! Every anchor matched by a profile's [`LinkSource`] selectors is checked
//! against its [`LinkRule`], resolved against the site origin and collected in
//! first-seen order. The same article is typically linked several times from
//! one listing (thumbnail, headline, "more" link), so the result is
//! de-duplicated before anything already visited is dropped.

use super::profile::{Category, LinkRule, LinkSource, SiteProfile, SubcategoryMatch, SubcategoryRule};
use crate::error::ConfigError;
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::HashSet;
use tracing::debug;
use url::Url;

static ANCHORS: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").expect("valid selector"));

impl LinkRule {
    /// Whether a raw `href` found on the listing page of `category` qualifies
    /// as an article link.
    pub fn qualifies(&self, href: &str, category: &str) -> bool {
        if self.root_relative_only && !is_root_relative(href) {
            return false;
        }
        if !self.include_any.is_empty() && !self.include_any.iter().any(|s| href.contains(s.as_str())) {
            return false;
        }
        if self.exclude_prefixes.iter().any(|p| href.starts_with(p.as_str())) {
            return false;
        }
        if href.split('/').count() < self.min_segments {
            return false;
        }
        if self.exclude_category_prefix && href.starts_with(&format!("/{category}/")) {
            return false;
        }
        true
    }
}

impl SubcategoryRule {
    /// Whether a raw `href` looks like a listing related to `category`.
    pub fn matches(&self, href: &str, category: &str) -> bool {
        if self.root_relative_only && !is_root_relative(href) {
            return false;
        }
        match self.matcher {
            SubcategoryMatch::Contains => href.contains(category),
            SubcategoryMatch::Prefix => href.starts_with(&format!("/{category}/")),
        }
    }
}

fn is_root_relative(href: &str) -> bool {
    href.starts_with('/') && !href.starts_with("//")
}

/// Compiled link sources of one profile.
#[derive(Debug)]
pub struct LinkExtractor {
    origin: Url,
    primary: Vec<(Selector, LinkRule)>,
    fallback: Vec<(Selector, LinkRule)>,
    /// Used instead of `primary` on sub-category listings when non-empty.
    sublisting: Vec<(Selector, LinkRule)>,
    subcategories: Option<SubcategoryRule>,
}

impl LinkExtractor {
    pub fn new(profile: &SiteProfile) -> Result<Self, ConfigError> {
        Ok(Self {
            origin: profile.origin_url()?,
            primary: compile_sources(profile, &profile.links)?,
            fallback: compile_sources(profile, &profile.fallback_links)?,
            sublisting: compile_sources(profile, &profile.subcategory_links)?,
            subcategories: profile.subcategories.clone(),
        })
    }

    /// Resolve an `href` to an absolute http(s) URL without fragment.
    ///
    /// Returns `None` for empty, fragment-only, `javascript:`, `mailto:` and
    /// other non-web links.
    pub fn resolve(&self, href: &str) -> Option<String> {
        let href = href.trim();
        if href.is_empty() || href.starts_with('#') {
            return None;
        }
        let mut url = self.origin.join(href).ok()?;
        if !matches!(url.scheme(), "http" | "https") {
            return None;
        }
        url.set_fragment(None);
        Some(url.to_string())
    }

    /// Qualifying, de-duplicated, not yet visited article URLs of a listing
    /// page, in document order.
    pub fn article_links(
        &self,
        document: &Html,
        category: &str,
        visited: &HashSet<String>,
    ) -> Vec<String> {
        self.links_from(&self.primary, document, category, visited)
    }

    /// Like [`article_links`](Self::article_links), for a sub-category
    /// listing of `category`.
    pub fn subcategory_article_links(
        &self,
        document: &Html,
        category: &str,
        visited: &HashSet<String>,
    ) -> Vec<String> {
        let sources = if self.sublisting.is_empty() {
            &self.primary
        } else {
            &self.sublisting
        };
        self.links_from(sources, document, category, visited)
    }

    fn links_from(
        &self,
        sources: &[(Selector, LinkRule)],
        document: &Html,
        category: &str,
        visited: &HashSet<String>,
    ) -> Vec<String> {
        let mut candidates = self.collect(sources, document, category);
        if candidates.is_empty() && !self.fallback.is_empty() {
            debug!(category, "Primary link selectors found nothing; trying fallback selectors");
            candidates = self.collect(&self.fallback, document, category);
        }
        candidates
            .into_iter()
            .unique()
            .filter(|url| !visited.contains(url))
            .collect()
    }

    fn collect(&self, sources: &[(Selector, LinkRule)], document: &Html, category: &str) -> Vec<String> {
        let mut found = Vec::new();
        for (selector, rule) in sources {
            for element in document.select(selector) {
                let Some(href) = element.value().attr("href") else {
                    continue;
                };
                let href = href.trim();
                if !rule.qualifies(href, category) {
                    continue;
                }
                if let Some(url) = self.resolve(href) {
                    found.push(url);
                }
            }
        }
        found
    }

    /// Up to `limit` sibling or sub-category listing URLs for `category`,
    /// excluding the category's own listing and listings already crawled.
    ///
    /// Empty when the profile has no sub-category rule.
    pub fn subcategory_links(
        &self,
        document: &Html,
        category: &Category,
        seen_listings: &HashSet<String>,
    ) -> Vec<String> {
        let Some(rule) = &self.subcategories else {
            return Vec::new();
        };
        let root = trim_trailing_slash(&category.url);
        document
            .select(&ANCHORS)
            .filter_map(|element| element.value().attr("href"))
            .map(str::trim)
            .filter(|href| rule.matches(href, &category.name))
            .filter_map(|href| self.resolve(href))
            .filter(|url| trim_trailing_slash(url) != root)
            .filter(|url| !seen_listings.contains(url))
            .unique()
            .take(rule.limit)
            .collect()
    }
}

fn compile_sources(
    profile: &SiteProfile,
    sources: &[LinkSource],
) -> Result<Vec<(Selector, LinkRule)>, ConfigError> {
    sources
        .iter()
        .map(|source| Ok((profile.selector(&source.selector)?, source.rule.clone())))
        .collect()
}

fn trim_trailing_slash(url: &str) -> &str {
    url.strip_suffix('/').unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::{cnnturk, haberturk, ntv};

    fn parse(html: &str) -> Html {
        Html::parse_document(html)
    }

    #[test]
    fn test_cnnturk_rule_requires_haber_or_video() {
        let rule = &cnnturk::profile().links[0].rule;
        assert!(rule.qualifies("/dunya/haber/abd-secimleri", "dunya"));
        assert!(rule.qualifies("/video/ekonomi/borsa", "ekonomi"));
        assert!(!rule.qualifies("/yazarlar/ahmet", "dunya"));
    }

    #[test]
    fn test_haberturk_rule_excludes_sections_and_authors() {
        let rule = &haberturk::profile().links[0].rule;
        assert!(!rule.qualifies("/istanbul-da-kar-yagisi-3712345", "yasam"));
        assert!(rule.qualifies("/gundem/istanbul-da-kar-yagisi-3712345", "yasam"));
        assert!(!rule.qualifies("/yazarlar/x/y", "yasam"));
        assert!(!rule.qualifies("/video/haber/x", "yasam"));
        assert!(!rule.qualifies("/yasam/saglik", "yasam"));
        assert!(!rule.qualifies("https://www.haberturk.com/gundem/x", "yasam"));
    }

    #[test]
    fn test_default_rule_accepts_anything() {
        let rule = LinkRule::default();
        assert!(rule.qualifies("", "x"));
        assert!(rule.qualifies("https://elsewhere.org/a", "x"));
    }

    #[test]
    fn test_resolve() {
        let links = LinkExtractor::new(&cnnturk::profile()).unwrap();
        assert_eq!(
            links.resolve("/dunya/haber/x").as_deref(),
            Some("https://www.cnnturk.com/dunya/haber/x")
        );
        assert_eq!(
            links.resolve("https://www.cnnturk.com/a#yorumlar").as_deref(),
            Some("https://www.cnnturk.com/a")
        );
        assert_eq!(links.resolve("#top"), None);
        assert_eq!(links.resolve("javascript:void(0)"), None);
        assert_eq!(links.resolve("mailto:haber@cnnturk.com"), None);
        assert_eq!(links.resolve("   "), None);
    }

    #[test]
    fn test_article_links_dedup_in_document_order() {
        let links = LinkExtractor::new(&cnnturk::profile()).unwrap();
        let doc = parse(
            r#"<html><body>
                <a href="/dunya/haber/b"><img src="b.jpg"></a>
                <a href="/dunya/haber/a">A</a>
                <a href="/dunya/haber/b">B headline</a>
                <a href="https://www.cnnturk.com/dunya/haber/a">A again</a>
                <a href="/yazarlar/kim">Yazar</a>
                <a>no href</a>
            </body></html>"#,
        );
        let found = links.article_links(&doc, "dunya", &HashSet::new());
        assert_eq!(
            found,
            vec![
                "https://www.cnnturk.com/dunya/haber/b".to_string(),
                "https://www.cnnturk.com/dunya/haber/a".to_string(),
            ]
        );
    }

    #[test]
    fn test_article_links_skip_visited() {
        let links = LinkExtractor::new(&cnnturk::profile()).unwrap();
        let doc = parse(r#"<a href="/haber/1">1</a><a href="/haber/2">2</a>"#);
        let visited: HashSet<String> = ["https://www.cnnturk.com/haber/1".to_string()].into();
        assert_eq!(
            links.article_links(&doc, "spor", &visited),
            vec!["https://www.cnnturk.com/haber/2".to_string()]
        );
    }

    #[test]
    fn test_article_links_empty_listing() {
        let links = LinkExtractor::new(&haberturk::profile()).unwrap();
        let doc = parse("<html><body><p>Bakım çalışması</p></body></html>");
        assert!(links.article_links(&doc, "spor", &HashSet::new()).is_empty());
    }

    #[test]
    fn test_haberturk_widget_selectors_add_links() {
        let links = LinkExtractor::new(&haberturk::profile()).unwrap();
        let doc = parse(
            r#"<div class="news-card"><a href="/spor/futbol/derbi-3712">Derbi</a></div>
               <a href="/ekonomi/altin-fiyatlari-3713">Altın</a>"#,
        );
        let found = links.article_links(&doc, "spor", &HashSet::new());
        assert_eq!(
            found,
            vec![
                "https://www.haberturk.com/ekonomi/altin-fiyatlari-3713".to_string(),
                "https://www.haberturk.com/spor/futbol/derbi-3712".to_string(),
            ]
        );
    }

    #[test]
    fn test_haberturk_subcategory_page_keeps_section_articles() {
        let links = LinkExtractor::new(&haberturk::profile()).unwrap();
        let doc = parse(
            r#"<a href="/spor/futbol/derbi-3712">Derbi</a>
               <a href="/video/spor/ozet">Özet</a>"#,
        );
        assert!(links.article_links(&doc, "spor", &HashSet::new()).is_empty());
        assert_eq!(
            links.subcategory_article_links(&doc, "spor", &HashSet::new()),
            vec!["https://www.haberturk.com/spor/futbol/derbi-3712".to_string()]
        );
    }

    #[test]
    fn test_subcategory_pages_default_to_primary_sources() {
        let links = LinkExtractor::new(&cnnturk::profile()).unwrap();
        let doc = parse(r#"<a href="/spor/haber/transfer">T</a><a href="/spor/futbol">F</a>"#);
        assert_eq!(
            links.subcategory_article_links(&doc, "spor", &HashSet::new()),
            links.article_links(&doc, "spor", &HashSet::new())
        );
    }

    #[test]
    fn test_ntv_falls_back_to_haber_links() {
        let links = LinkExtractor::new(&ntv::profile()).unwrap();

        let cards = parse(
            r#"<a class="card-text-link" href="/ekonomi/faiz-karari">Faiz</a>
               <a href="/haber/ekonomi/ignored">x</a>"#,
        );
        assert_eq!(
            links.article_links(&cards, "ekonomi", &HashSet::new()),
            vec!["https://www.ntv.com.tr/ekonomi/faiz-karari".to_string()]
        );

        let plain = parse(
            r#"<a href="/haber/ekonomi/enflasyon">Enflasyon</a><a href="/hakkimizda">x</a>"#,
        );
        assert_eq!(
            links.article_links(&plain, "ekonomi", &HashSet::new()),
            vec!["https://www.ntv.com.tr/haber/ekonomi/enflasyon".to_string()]
        );
    }

    #[test]
    fn test_subcategory_links_bounded_and_exclude_root() {
        let links = LinkExtractor::new(&cnnturk::profile()).unwrap();
        let category = Category::new("dunya", "https://www.cnnturk.com/dunya-haberleri");
        let mut html = String::from(r#"<a href="/dunya-haberleri">root</a><a href="/dunya-haberleri/">root/</a>"#);
        for i in 0..8 {
            html.push_str(&format!(r#"<a href="/dunya/bolge-{i}">b{i}</a>"#));
        }
        html.push_str(r#"<a href="/dunya/bolge-0">dup</a><a href="/ekonomi">other</a>"#);
        let doc = parse(&html);
        let seen: HashSet<String> = ["https://www.cnnturk.com/dunya/bolge-1".to_string()].into();

        let subs = links.subcategory_links(&doc, &category, &seen);
        assert_eq!(
            subs,
            vec![
                "https://www.cnnturk.com/dunya/bolge-0".to_string(),
                "https://www.cnnturk.com/dunya/bolge-2".to_string(),
                "https://www.cnnturk.com/dunya/bolge-3".to_string(),
                "https://www.cnnturk.com/dunya/bolge-4".to_string(),
                "https://www.cnnturk.com/dunya/bolge-5".to_string(),
            ]
        );
    }

    #[test]
    fn test_subcategory_prefix_rule() {
        let links = LinkExtractor::new(&haberturk::profile()).unwrap();
        let category = Category::new("spor", "https://www.haberturk.com/spor");
        let doc = parse(
            r#"<a href="/spor">root</a><a href="/spor/futbol">futbol</a>
               <a href="/sporcu-haberleri">x</a><a href="https://www.haberturk.com/spor/basketbol">abs</a>"#,
        );
        assert_eq!(
            links.subcategory_links(&doc, &category, &HashSet::new()),
            vec!["https://www.haberturk.com/spor/futbol".to_string()]
        );
    }

    #[test]
    fn test_no_subcategory_rule_yields_nothing() {
        let links = LinkExtractor::new(&ntv::profile()).unwrap();
        let category = Category::new("spor", "https://www.ntv.com.tr/sporskor");
        let doc = parse(r#"<a href="/spor/futbol">futbol</a>"#);
        assert!(links.subcategory_links(&doc, &category, &HashSet::new()).is_empty());
    }
}
