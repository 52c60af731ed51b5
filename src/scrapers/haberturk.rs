//! Habertürk profile.
//!
//! Habertürk articles are root-relative links with at least two path
//! segments. Author pages (`/yazar...`), videos and the current category's own
//! section pages (`/<category>/...`) are excluded from the generic anchor scan,
//! while anchors inside the news card widgets are taken as-is.
//!
//! Sub-categories are the `/<category>/<sub>` section links of the listing.
//! Their pages are scanned with the same rules minus the section exclusion.

use super::profile::{
    Category, DEFAULT_CONTENT_BLOCKS, DEFAULT_SUBCATEGORY_LIMIT, LinkRule, LinkSource, SiteProfile,
    SubcategoryMatch, SubcategoryRule, TitleStrategy,
};
use crate::fetch::DelayRange;

pub const NAME: &str = "haberturk";

const WIDGET_ANCHORS: &str =
    ".news-container a, .news-card a, .news-box a, .news-item a, .swiper-slide a, .widget-news a";

/// Generic anchors plus widget anchors. On a sub-category page the
/// `/<category>/...` links are the articles themselves, so they are kept there.
fn link_sources(exclude_category_prefix: bool) -> Vec<LinkSource> {
    vec![
        LinkSource::new(
            "a[href]",
            LinkRule {
                root_relative_only: true,
                exclude_prefixes: vec!["/yazar".to_string(), "/video".to_string()],
                min_segments: 3,
                exclude_category_prefix,
                ..LinkRule::default()
            },
        ),
        LinkSource::new(
            WIDGET_ANCHORS,
            LinkRule {
                root_relative_only: true,
                ..LinkRule::default()
            },
        ),
    ]
}

pub fn profile() -> SiteProfile {
    SiteProfile {
        name: NAME.to_string(),
        origin: "https://www.haberturk.com".to_string(),
        categories: vec![
            Category::new("dunya", "https://www.haberturk.com/dunya"),
            Category::new("ekonomi", "https://www.haberturk.com/ekonomi"),
            Category::new("spor", "https://www.haberturk.com/spor"),
            Category::new("egitim", "https://www.haberturk.com/egitim"),
            Category::new("magazin", "https://www.haberturk.com/magazin"),
            Category::new("yasam", "https://www.haberturk.com/yasam"),
        ],
        title: vec![
            TitleStrategy::Meta("og:title".to_string()),
            TitleStrategy::Selector("h1.title".to_string()),
            TitleStrategy::Selector("h1.haber-title".to_string()),
            TitleStrategy::Selector("h1.headline".to_string()),
            TitleStrategy::Selector("h1".to_string()),
            TitleStrategy::Selector(".news-title".to_string()),
            TitleStrategy::Selector(".detail-title".to_string()),
            TitleStrategy::Selector(".article-title".to_string()),
        ],
        content_containers: [
            ".news-content",
            ".haber-detay",
            ".article-content",
            ".news-detail-text",
            ".haber-text",
            ".detail-content",
            "article",
            ".article-body",
            ".detail-content-body",
        ]
        .map(String::from)
        .to_vec(),
        content_blocks: DEFAULT_CONTENT_BLOCKS.to_string(),
        min_content_chars: None,
        links: link_sources(true),
        fallback_links: vec![],
        subcategory_links: link_sources(false),
        subcategories: Some(SubcategoryRule {
            matcher: SubcategoryMatch::Prefix,
            root_relative_only: true,
            limit: DEFAULT_SUBCATEGORY_LIMIT,
        }),
        pagination: None,
        listing_delay: DelayRange::LISTING,
        article_delay: DelayRange::ARTICLE,
    }
}
