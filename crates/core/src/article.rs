//! Extracted entry data passed from extraction to rendering.
//!
//! [`DocumentData`] is the only value that crosses from the extraction
//! side of the pipeline to the LaTeX renderer. It is built once per run
//! and never mutated afterwards.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::Result;
use crate::toc::TocEntry;

/// Rendered body text of each top-level section, keyed by anchor id.
///
/// Keys are kept sorted so serialized output is stable between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SectionContent {
    bodies: BTreeMap<String, String>,
}

impl SectionContent {
    pub fn get(&self, id: &str) -> Option<&str> {
        self.bodies.get(id).map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.bodies.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

impl FromIterator<(String, String)> for SectionContent {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self { bodies: iter.into_iter().collect() }
    }
}

/// Everything extracted from one encyclopedia entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentData {
    /// Entry title from the article heading.
    pub title: String,

    /// Publication and revision line.
    pub publication: String,

    /// Flattened table of contents in document order.
    pub toc: Vec<TocEntry>,

    /// Converted preamble paragraph.
    pub overview: String,

    /// Converted bodies of the top-level sections.
    pub section_contents: SectionContent,
}

impl DocumentData {
    /// Number of top-level sections in the table of contents.
    pub fn section_count(&self) -> usize {
        self.toc.iter().filter(|entry| entry.level == 1).count()
    }

    /// Top-level sections whose heading could not be found in the page.
    pub fn sections_without_body(&self) -> impl Iterator<Item = &TocEntry> {
        self.toc
            .iter()
            .filter(|entry| entry.level == 1 && !self.section_contents.contains(&entry.id))
    }

    /// Gets the document data as structured JSON.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}
