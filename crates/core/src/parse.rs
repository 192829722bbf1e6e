//! HTML parsing and DOM navigation.
//!
//! This module provides the [`Document`] and [`Element`] types for parsing
//! the source page and navigating it with CSS selectors and sibling walks.
//!
//! # Example
//!
//! ```rust
//! use texentry_core::parse::Document;
//!
//! let html = r#"
//!     <html>
//!         <body>
//!             <div id="aueditable"><h1>Henri Bergson</h1></div>
//!         </body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse(html).unwrap();
//! let heading = doc.select_first("#aueditable h1").unwrap().unwrap();
//! assert_eq!(heading.text(), "Henri Bergson");
//! ```

use scraper::{ElementRef, Html, Selector};

use crate::markup::MarkupNode;
use crate::{Result, TexEntryError};

fn compile_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| TexEntryError::HtmlParseError(format!("Invalid selector: {}", e)))
}

/// Represents a parsed HTML document.
///
/// # Example
///
/// ```rust
/// use texentry_core::parse::Document;
///
/// let html = "<html><body><div id=\"pubinfo\">First published 2004</div></body></html>";
/// let doc = Document::parse(html).unwrap();
/// let pubinfo = doc.select_first("div#pubinfo").unwrap().unwrap();
/// assert_eq!(pubinfo.text(), "First published 2004");
/// ```
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses HTML from a string.
    ///
    /// The HTML5 parser is error tolerant, so this only fails on
    /// conditions the parser itself cannot represent.
    pub fn parse(html: &str) -> Result<Self> {
        let html = Html::parse_document(html);
        Ok(Self { html })
    }

    /// Gets the root `<html>` element.
    pub fn root(&self) -> Element<'_> {
        Element { element: self.html.root_element() }
    }

    /// Selects all elements matching a CSS selector, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`TexEntryError::HtmlParseError`] if the selector is invalid.
    ///
    /// # Example
    ///
    /// ```rust
    /// use texentry_core::parse::Document;
    ///
    /// let html = r#"<p class="content">First</p><p class="content">Second</p>"#;
    /// let doc = Document::parse(html).unwrap();
    /// let elements = doc.select("p.content").unwrap();
    /// assert_eq!(elements.len(), 2);
    /// ```
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = compile_selector(selector)?;
        Ok(self.html.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// Selects the first element matching a CSS selector, if any.
    pub fn select_first(&'_ self, selector: &str) -> Result<Option<Element<'_>>> {
        let sel = compile_selector(selector)?;
        Ok(self.html.select(&sel).next().map(|el| Element { element: el }))
    }
}

/// A borrowed element of a parsed [`Document`].
///
/// # Example
///
/// ```rust
/// use texentry_core::parse::Document;
///
/// let html = r##"<a href="#Life">1. Life</a>"##;
/// let doc = Document::parse(html).unwrap();
/// let link = &doc.select("a").unwrap()[0];
///
/// assert_eq!(link.text(), "1. Life");
/// assert_eq!(link.attr("href"), Some("#Life"));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Element<'a> {
    element: ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// Gets the concatenated text of all descendant text nodes.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Gets the descendant text with whitespace runs collapsed and trimmed.
    pub fn normalized_text(&self) -> String {
        self.element.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ")
    }

    /// Gets the value of an attribute.
    pub fn attr(&self, name: &'_ str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Gets the `id` attribute.
    pub fn id(&self) -> Option<&'a str> {
        self.element.value().id()
    }

    /// Gets the lowercase tag name (e.g., "div", "a", "h2").
    pub fn tag_name(&self) -> String {
        self.element.value().name().to_lowercase()
    }

    /// Checks the tag name without allocating.
    pub fn is(&self, tag: &str) -> bool {
        self.element.value().name().eq_ignore_ascii_case(tag)
    }

    /// Rank of a heading element: 1 for `<h1>` through 6 for `<h6>`.
    pub fn heading_rank(&self) -> Option<u8> {
        match self.tag_name().as_str() {
            "h1" => Some(1),
            "h2" => Some(2),
            "h3" => Some(3),
            "h4" => Some(4),
            "h5" => Some(5),
            "h6" => Some(6),
            _ => None,
        }
    }

    /// Direct element children, in document order.
    pub fn child_elements(self) -> impl Iterator<Item = Element<'a>> {
        self.element.children().filter_map(ElementRef::wrap).map(|element| Element { element })
    }

    /// Element siblings after this one, in document order.
    pub fn following_siblings(self) -> impl Iterator<Item = Element<'a>> {
        self.element
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .map(|element| Element { element })
    }

    /// Selects descendant elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`TexEntryError::HtmlParseError`] if the selector is invalid.
    pub fn select(&self, selector: &str) -> Result<Vec<Element<'a>>> {
        let sel = compile_selector(selector)?;
        Ok(self.element.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// Selects the first descendant matching a CSS selector, if any.
    pub fn select_first(&self, selector: &str) -> Result<Option<Element<'a>>> {
        let sel = compile_selector(selector)?;
        Ok(self.element.select(&sel).next().map(|el| Element { element: el }))
    }

    /// Snapshots this element and its subtree as a [`MarkupNode`].
    pub fn to_markup(&self) -> MarkupNode {
        MarkupNode::from_element_ref(self.element)
    }
}
