//! Title and body extraction from article pages.
//!
//! Both fields are resolved through an ordered cascade where the first step
//! producing non-empty text wins:
//!
//! | Field | Steps |
//! |-------|-------|
//! | title | profile [`TitleStrategy`] list (Open-Graph title, then CSS selectors) |
//! | content | first matching container → its block elements → its full text → `og:description` |
//!
//! All results are whitespace-normalised. A page where either field stays
//! empty is reported as [`ExtractionIncomplete`].

use super::profile::{SiteProfile, TitleStrategy};
use crate::error::{ConfigError, ExtractionIncomplete};
use crate::utils::normalize_whitespace;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static OG_DESCRIPTION: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="og:description"]"#).expect("valid selector"));

/// Title and body of one article page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub title: String,
    pub content: String,
}

#[derive(Debug)]
enum TitleStep {
    Meta(Selector),
    Element(Selector),
}

/// Compiled extraction cascades of one profile.
#[derive(Debug)]
pub struct ArticleExtractor {
    title: Vec<TitleStep>,
    containers: Vec<Selector>,
    blocks: Selector,
    min_content_chars: Option<usize>,
}

impl ArticleExtractor {
    pub fn new(profile: &SiteProfile) -> Result<Self, ConfigError> {
        let title = profile
            .title
            .iter()
            .map(|step| match step {
                TitleStrategy::Meta(property) => profile
                    .selector(&format!(r#"meta[property="{property}"]"#))
                    .map(TitleStep::Meta),
                TitleStrategy::Selector(css) => profile.selector(css).map(TitleStep::Element),
            })
            .collect::<Result<Vec<_>, _>>()?;
        let containers = profile
            .content_containers
            .iter()
            .map(|css| profile.selector(css))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            title,
            containers,
            blocks: profile.selector(&profile.content_blocks)?,
            min_content_chars: profile.min_content_chars,
        })
    }

    /// Parse `html` and run both cascades.
    pub fn extract(&self, html: &str) -> Result<Extracted, ExtractionIncomplete> {
        let document = Html::parse_document(html);
        self.extract_document(&document)
    }

    pub fn extract_document(&self, document: &Html) -> Result<Extracted, ExtractionIncomplete> {
        let title = self.title(document);
        let content = self.content(document);
        match (title, content) {
            (Some(title), Some(content)) => Ok(Extracted { title, content }),
            (title, content) => Err(ExtractionIncomplete {
                missing_title: title.is_none(),
                missing_content: content.is_none(),
            }),
        }
    }

    fn title(&self, document: &Html) -> Option<String> {
        self.title.iter().find_map(|step| match step {
            TitleStep::Meta(selector) => meta_content(document, selector),
            TitleStep::Element(selector) => document
                .select(selector)
                .next()
                .and_then(|element| non_empty(&element_text(element))),
        })
    }

    fn content(&self, document: &Html) -> Option<String> {
        let container = self
            .containers
            .iter()
            .find_map(|selector| document.select(selector).next());
        let body = container
            .and_then(|container| self.container_text(container))
            .or_else(|| meta_content(document, &OG_DESCRIPTION))?;

        match self.min_content_chars {
            Some(min) if body.chars().count() < min => {
                Some(meta_content(document, &OG_DESCRIPTION).unwrap_or(body))
            }
            _ => Some(body),
        }
    }

    /// Joined block elements, or the container's whole text when none match.
    fn container_text(&self, container: ElementRef<'_>) -> Option<String> {
        let joined = container
            .select(&self.blocks)
            .map(|block| element_text(block).trim().to_string())
            .collect::<Vec<_>>()
            .join(" ");
        non_empty(&joined).or_else(|| non_empty(&element_text(container)))
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

fn meta_content(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .and_then(non_empty)
}

fn non_empty(text: &str) -> Option<String> {
    let normalized = normalize_whitespace(text);
    (!normalized.is_empty()).then_some(normalized)
}
