//! CNN Türk profile.
//!
//! Category listings live at `https://www.cnnturk.com/<section>-haberleri`.
//! Article URLs always carry a `/haber/` or `/video/` path segment and are
//! usually root-relative.
//!
//! When a listing runs dry the driver falls back to any link whose path
//! mentions the category token (e.g. `/dunya/avrupa`).

use super::profile::{
    Category, DEFAULT_CONTENT_BLOCKS, DEFAULT_SUBCATEGORY_LIMIT, LinkRule, LinkSource, SiteProfile,
    SubcategoryMatch, SubcategoryRule, TitleStrategy,
};
use crate::fetch::DelayRange;

pub const NAME: &str = "cnnturk";

pub fn profile() -> SiteProfile {
    SiteProfile {
        name: NAME.to_string(),
        origin: "https://www.cnnturk.com".to_string(),
        categories: vec![
            Category::new("dunya", "https://www.cnnturk.com/dunya-haberleri"),
            Category::new("ekonomi", "https://www.cnnturk.com/ekonomi-haberleri"),
            Category::new("spor", "https://www.cnnturk.com/spor-haberleri"),
            Category::new("egitim", "https://www.cnnturk.com/egitim"),
            Category::new("magazin", "https://www.cnnturk.com/magazin-haberleri"),
            Category::new("yasam", "https://www.cnnturk.com/yasam-haberleri"),
        ],
        title: vec![
            TitleStrategy::Meta("og:title".to_string()),
            TitleStrategy::Selector("h1.detail-title".to_string()),
            TitleStrategy::Selector("h1.news-detail-title".to_string()),
            TitleStrategy::Selector("h1.title".to_string()),
            TitleStrategy::Selector("h1".to_string()),
            TitleStrategy::Selector(".news-detail-title".to_string()),
        ],
        content_containers: [
            ".detail-content-container",
            ".news-content",
            ".detail-content",
            "article",
            ".article-body",
            ".news-detail-text",
        ]
        .map(String::from)
        .to_vec(),
        content_blocks: DEFAULT_CONTENT_BLOCKS.to_string(),
        min_content_chars: None,
        links: vec![LinkSource::new(
            "a[href]",
            LinkRule {
                include_any: vec!["/haber/".to_string(), "/video/".to_string()],
                ..LinkRule::default()
            },
        )],
        fallback_links: vec![],
        subcategory_links: vec![],
        subcategories: Some(SubcategoryRule {
            matcher: SubcategoryMatch::Contains,
            root_relative_only: false,
            limit: DEFAULT_SUBCATEGORY_LIMIT,
        }),
        pagination: None,
        listing_delay: DelayRange::LISTING,
        article_delay: DelayRange::ARTICLE,
    }
}
