//! Typed inline markup tree.
//!
//! [`MarkupNode`] is a closed, owned snapshot of an HTML subtree, reduced
//! to the distinctions the LaTeX converter cares about. It is built from a
//! parsed [`Element`](crate::parse::Element) on demand and dropped once the
//! paragraph it represents has been converted.

use std::collections::BTreeMap;

use scraper::ElementRef;

/// Element kinds that receive their own markup construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// `<em>`
    Emphasis,
    /// `<strong>`
    Strong,
    /// `<a>`
    Hyperlink,
    /// Any other element; its children are kept, its identity is not.
    Other,
}

impl TagKind {
    /// Maps a lowercase HTML tag name to its kind.
    pub fn from_tag_name(name: &str) -> Self {
        match name {
            "em" => TagKind::Emphasis,
            "strong" => TagKind::Strong,
            "a" => TagKind::Hyperlink,
            _ => TagKind::Other,
        }
    }
}

/// A node of an inline markup tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode {
    /// Literal character data.
    Text(String),
    /// An element with its children in document order.
    Element { kind: TagKind, children: Vec<MarkupNode>, attributes: BTreeMap<String, String> },
    /// Comments, doctypes and processing instructions.
    Other,
}

impl MarkupNode {
    /// Shorthand for a text node.
    pub fn text(content: impl Into<String>) -> Self {
        MarkupNode::Text(content.into())
    }

    /// Shorthand for an element node without attributes.
    pub fn element(kind: TagKind, children: Vec<MarkupNode>) -> Self {
        MarkupNode::Element { kind, children, attributes: BTreeMap::new() }
    }

    /// Shorthand for a hyperlink, with or without a target.
    pub fn link(href: Option<&str>, children: Vec<MarkupNode>) -> Self {
        let mut attributes = BTreeMap::new();
        if let Some(href) = href {
            attributes.insert("href".to_string(), href.to_string());
        }
        MarkupNode::Element { kind: TagKind::Hyperlink, children, attributes }
    }

    /// Looks up an attribute on an element node.
    pub fn attr(&self, name: &str) -> Option<&str> {
        match self {
            MarkupNode::Element { attributes, .. } => attributes.get(name).map(String::as_str),
            _ => None,
        }
    }

    /// Builds an owned tree from a parsed element and all its descendants.
    pub(crate) fn from_element_ref(element: ElementRef<'_>) -> Self {
        let children = element
            .children()
            .map(|child| {
                if let Some(child_element) = ElementRef::wrap(child) {
                    MarkupNode::from_element_ref(child_element)
                } else if let Some(text) = child.value().as_text() {
                    let content: &str = text;
                    MarkupNode::Text(content.to_string())
                } else {
                    MarkupNode::Other
                }
            })
            .collect();

        let attributes = element
            .value()
            .attrs()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        MarkupNode::Element {
            kind: TagKind::from_tag_name(&element.value().name().to_lowercase()),
            children,
            attributes,
        }
    }
}
