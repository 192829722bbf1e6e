//! Inline HTML to LaTeX conversion.
//!
//! Walks a [`MarkupNode`] tree and emits the equivalent LaTeX: `<em>`
//! becomes `\emph{}`, `<strong>` becomes `\textbf{}`, `<a>` becomes
//! `\href{}{}`, and every other element is flattened into its children.
//!
//! # Example
//!
//! ```rust
//! use texentry_core::inline::convert_inline;
//! use texentry_core::markup::{MarkupNode, TagKind};
//!
//! let node = MarkupNode::element(
//!     TagKind::Other,
//!     vec![
//!         MarkupNode::text("Time & "),
//!         MarkupNode::element(TagKind::Emphasis, vec![MarkupNode::text("duration")]),
//!     ],
//! );
//! assert_eq!(convert_inline(&node), r"Time \& \emph{duration}");
//! ```

use url::Url;

use crate::markup::{MarkupNode, TagKind};

/// Link target substituted when a hyperlink has no `href`.
pub const PLACEHOLDER_TARGET: &str = "#";

/// Escapes characters that LaTeX would otherwise interpret.
pub fn escape_latex(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => escaped.push_str(r"\textbackslash{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            '~' => escaped.push_str(r"\textasciitilde{}"),
            '^' => escaped.push_str(r"\textasciicircum{}"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Escapes a link target for the first argument of `\href`.
///
/// hyperref reads a raw `#` or `~` only when `\href` is not itself inside
/// another command's argument. Links nest inside `\emph` and `\textbf`, so
/// all three specials are escaped; hyperref accepts the escaped forms
/// everywhere.
fn escape_url(target: &str) -> String {
    let mut escaped = String::with_capacity(target.len());
    for ch in target.chars() {
        if matches!(ch, '%' | '#' | '~') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Collapses every whitespace run to one space and trims both ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Converts markup trees to LaTeX, optionally resolving relative links.
#[derive(Debug, Clone, Default)]
pub struct InlineConverter {
    base_url: Option<Url>,
}

impl InlineConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves relative link targets against `base_url`.
    pub fn with_base_url(base_url: Option<Url>) -> Self {
        Self { base_url }
    }

    /// Converts a node and its subtree, preserving document order.
    pub fn convert(&self, node: &MarkupNode) -> String {
        match node {
            MarkupNode::Text(text) => escape_latex(text),
            MarkupNode::Element { kind, children, attributes } => {
                let inner = self.convert_children(children);
                match kind {
                    TagKind::Emphasis => format!(r"\emph{{{}}}", inner),
                    TagKind::Strong => format!(r"\textbf{{{}}}", inner),
                    TagKind::Hyperlink => {
                        let target = attributes
                            .get("href")
                            .map(|href| self.resolve_target(href))
                            .unwrap_or_else(|| PLACEHOLDER_TARGET.to_string());
                        format!(r"\href{{{}}}{{{}}}", escape_url(&target), inner)
                    }
                    TagKind::Other => inner,
                }
            }
            MarkupNode::Other => String::new(),
        }
    }

    /// Converts a paragraph and normalizes its whitespace.
    pub fn convert_paragraph(&self, node: &MarkupNode) -> String {
        normalize_whitespace(&self.convert(node))
    }

    fn convert_children(&self, children: &[MarkupNode]) -> String {
        children.iter().map(|child| self.convert(child)).collect()
    }

    fn resolve_target(&self, href: &str) -> String {
        let href = href.trim();
        if href.starts_with('#') {
            return href.to_string();
        }

        match &self.base_url {
            Some(base) => base.join(href).map(String::from).unwrap_or_else(|_| href.to_string()),
            None => href.to_string(),
        }
    }
}

/// Converts a node with the default converter (no link resolution).
pub fn convert_inline(node: &MarkupNode) -> String {
    InlineConverter::new().convert(node)
}

/// Converts a paragraph with the default converter and normalizes whitespace.
pub fn convert_paragraph(node: &MarkupNode) -> String {
    InlineConverter::new().convert_paragraph(node)
}
