//! Entry extraction from a parsed source page.
//!
//! Every lookup here is optional. A page that is missing its title,
//! publication line, table of contents or preamble still produces a
//! [`DocumentData`], with the documented placeholder in place of the
//! missing piece and a warning in the log.

use url::Url;

use crate::article::DocumentData;
use crate::inline::InlineConverter;
use crate::parse::{Document, Element};
use crate::sections::extract_sections;
use crate::toc::extract_toc;

/// Title used when the article has no `<h1>`.
pub const DEFAULT_TITLE: &str = "No title found";

/// Publication line used when the article has no publication info block.
pub const DEFAULT_PUBLICATION: &str = "No publication info found";

/// Selectors locating each part of an entry page.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Container of the editable article body.
    pub article_selector: String,
    /// Title heading, searched inside the article.
    pub title_selector: String,
    /// Publication and revision block, searched inside the article.
    pub publication_selector: String,
    /// Table of contents container, searched in the whole page.
    pub toc_selector: String,
    /// Preamble container, searched inside the article.
    pub preamble_selector: String,
    /// Base URL for resolving relative links in converted text.
    pub base_url: Option<Url>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            article_selector: "div#aueditable".to_string(),
            title_selector: "h1".to_string(),
            publication_selector: "div#pubinfo".to_string(),
            toc_selector: "div#toc".to_string(),
            preamble_selector: "div#preamble".to_string(),
            base_url: None,
        }
    }
}

/// Looks up the first match of `selector`, treating invalid selectors as absent.
fn find<'a>(scope: Element<'a>, selector: &str) -> Option<Element<'a>> {
    match scope.select_first(selector) {
        Ok(found) => found,
        Err(e) => {
            tracing::warn!(selector = %selector, error = %e, "ignoring invalid selector");
            None
        }
    }
}

/// Extracts title, publication line, TOC, overview and section bodies.
pub fn extract_entry(doc: &Document, config: &ExtractConfig) -> DocumentData {
    let converter = InlineConverter::with_base_url(config.base_url.clone());
    let page = doc.root();

    let article = find(page, &config.article_selector).unwrap_or_else(|| {
        tracing::warn!(selector = %config.article_selector, "article container not found, using whole page");
        page
    });

    let title = find(article, &config.title_selector)
        .map(|heading| heading.normalized_text())
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| {
            tracing::warn!("entry title not found");
            DEFAULT_TITLE.to_string()
        });

    let publication = find(article, &config.publication_selector)
        .map(|block| block.normalized_text())
        .unwrap_or_else(|| {
            tracing::warn!("publication info not found");
            DEFAULT_PUBLICATION.to_string()
        });

    let toc = match find(page, &config.toc_selector) {
        Some(container) => extract_toc(container),
        None => {
            tracing::warn!(selector = %config.toc_selector, "table of contents not found");
            Vec::new()
        }
    };

    let overview = find(article, &config.preamble_selector)
        .and_then(|preamble| find(preamble, "p"))
        .map(|paragraph| converter.convert_paragraph(&paragraph.to_markup()))
        .unwrap_or_default();

    let section_contents = extract_sections(article, &toc, &converter);

    tracing::debug!(
        title = %title,
        toc_entries = toc.len(),
        sections = section_contents.len(),
        "extracted entry"
    );

    DocumentData { title, publication, toc, overview, section_contents }
}
