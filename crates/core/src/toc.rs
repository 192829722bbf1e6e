//! Table-of-contents extraction.
//!
//! Flattens the nested list inside the entry's TOC container into an
//! ordered sequence of [`TocEntry`] values. The walk is depth-first and
//! pre-order: an item is emitted before the items of its nested list.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::parse::Element;

static ENUMERATION_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\s*").unwrap());

/// One heading of the table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    /// Anchor id of the heading, without the leading `#`.
    pub id: String,
    /// Heading text with any "3." style enumeration removed.
    pub title: String,
    /// Nesting depth, 1 for top-level entries.
    pub level: usize,
}

impl TocEntry {
    pub fn new(id: impl Into<String>, title: impl Into<String>, level: usize) -> Self {
        Self { id: id.into(), title: title.into(), level }
    }
}

/// Removes a leading "3. " style enumeration from a heading title.
pub fn strip_enumeration(title: &str) -> &str {
    match ENUMERATION_PREFIX.find(title) {
        Some(prefix) => &title[prefix.end()..],
        None => title,
    }
}

/// Strips leading anchor markers from a link target.
pub fn anchor_id(href: &str) -> &str {
    href.trim_start_matches('#')
}

fn is_list(element: &Element<'_>) -> bool {
    element.is("ul") || element.is("ol")
}

/// Extracts the table of contents from its container.
///
/// The first list anywhere inside `container` is walked at level 1. A
/// container without a list yields an empty table.
pub fn extract_toc(container: Element<'_>) -> Vec<TocEntry> {
    let root = match container.select_first("ul, ol") {
        Ok(Some(list)) => list,
        _ => {
            tracing::warn!("table of contents container has no list");
            return Vec::new();
        }
    };

    let entries = walk_list(root, 1);
    tracing::debug!(entries = entries.len(), "extracted table of contents");
    entries
}

/// Flattens one list level and everything nested under it.
///
/// Only direct `<li>` children of `list` are visited here; items of
/// deeper lists are reached through the recursion only.
pub fn walk_list(list: Element<'_>, level: usize) -> Vec<TocEntry> {
    let mut entries = Vec::new();

    for item in list.child_elements().filter(|child| child.is("li")) {
        match item_link(item) {
            Some(link) => {
                // `item_link` only returns anchors carrying an href
                let href = link.attr("href").unwrap_or_default();
                let title = link.normalized_text();
                entries.push(TocEntry::new(anchor_id(href), strip_enumeration(&title), level));
            }
            None => {
                // Nested items still get walked, one level below the skipped item.
                tracing::debug!(depth = level, "skipping table of contents item without a link");
            }
        }

        if let Some(nested) = item.child_elements().find(is_list) {
            entries.extend(walk_list(nested, level + 1));
        }
    }

    entries
}

/// Finds the first `<a href>` of a list item, ignoring nested lists.
fn item_link<'a>(item: Element<'a>) -> Option<Element<'a>> {
    for child in item.child_elements() {
        if is_list(&child) {
            continue;
        }
        if child.is("a") && child.attr("href").is_some() {
            return Some(child);
        }
        if let Some(link) = item_link(child) {
            return Some(link);
        }
    }
    None
}
