//! NTV profile.
//!
//! NTV listings are paginated with `?page=N`; up to 20 pages are walked per
//! category. Article links are taken from the card widgets first, and only
//! when a page has none of those from any `/haber/` anchor.
//!
//! NTV bodies are often a single teaser paragraph, so bodies shorter than
//! 100 characters are replaced by the Open-Graph description when present.

use super::profile::{
    Category, DEFAULT_CONTENT_BLOCKS, LinkRule, LinkSource, Pagination, SiteProfile, TitleStrategy,
};
use crate::fetch::DelayRange;

pub const NAME: &str = "ntv";

pub fn profile() -> SiteProfile {
    SiteProfile {
        name: NAME.to_string(),
        origin: "https://www.ntv.com.tr".to_string(),
        categories: vec![
            Category::new("dunya", "https://www.ntv.com.tr/dunya"),
            Category::new("ekonomi", "https://www.ntv.com.tr/ekonomi"),
            Category::new("spor", "https://www.ntv.com.tr/sporskor"),
            Category::new("egitim", "https://www.ntv.com.tr/egitim"),
            Category::new("magazin", "https://www.ntv.com.tr/n-life/magazin"),
            Category::new("yasam", "https://www.ntv.com.tr/yasam"),
        ],
        title: vec![
            TitleStrategy::Meta("og:title".to_string()),
            TitleStrategy::Selector("h1.category-detail-title".to_string()),
            TitleStrategy::Selector("h1.title".to_string()),
            TitleStrategy::Selector("h1".to_string()),
            TitleStrategy::Selector(".article-title".to_string()),
        ],
        content_containers: [
            ".category-detail-content",
            ".article-body",
            ".news-content",
            ".article-content",
            ".content",
            ".detail-content",
            ".detail-page-content",
        ]
        .map(String::from)
        .to_vec(),
        content_blocks: DEFAULT_CONTENT_BLOCKS.to_string(),
        min_content_chars: Some(100),
        links: vec![LinkSource::new(
            "a.card-text-link, a.card-img-link, .category-item a",
            LinkRule::default(),
        )],
        fallback_links: vec![LinkSource::new(
            "a[href]",
            LinkRule {
                include_any: vec!["/haber/".to_string()],
                ..LinkRule::default()
            },
        )],
        subcategory_links: vec![],
        subcategories: None,
        pagination: Some(Pagination {
            max_pages: 20,
            query_param: "page".to_string(),
        }),
        listing_delay: DelayRange::LISTING,
        article_delay: DelayRange::ARTICLE,
    }
}
