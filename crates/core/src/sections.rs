//! Section body correlation.
//!
//! Pairs each top-level [`TocEntry`] with the heading carrying its anchor
//! and collects the paragraphs that follow that heading up to the next
//! heading of the same or higher rank.

use crate::article::SectionContent;
use crate::inline::InlineConverter;
use crate::parse::Element;
use crate::toc::TocEntry;

const HEADINGS: &str = "h1, h2, h3, h4, h5, h6";

/// Separator placed between the paragraphs of one section body.
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Finds the heading that carries `id`, either on itself or on an anchor inside it.
pub fn find_heading<'a>(scope: Element<'a>, id: &str) -> Option<Element<'a>> {
    let headings = scope.select(HEADINGS).ok()?;

    headings.into_iter().find(|heading| {
        heading.id() == Some(id)
            || heading.select("a[id], a[name]").is_ok_and(|anchors| {
                anchors
                    .iter()
                    .any(|anchor| anchor.id() == Some(id) || anchor.attr("name") == Some(id))
            })
    })
}

/// Converts the paragraphs between `heading` and the next same-or-higher-rank heading.
///
/// Lower-rank headings (subsections) do not end the body; their following
/// paragraphs are part of the enclosing section.
pub fn section_body(heading: Element<'_>, converter: &InlineConverter) -> String {
    let rank = heading.heading_rank().unwrap_or(1);
    let mut paragraphs = Vec::new();

    for sibling in heading.following_siblings() {
        if sibling.heading_rank().is_some_and(|r| r <= rank) {
            break;
        }
        if sibling.is("p") {
            let paragraph = converter.convert_paragraph(&sibling.to_markup());
            if !paragraph.is_empty() {
                paragraphs.push(paragraph);
            }
        }
    }

    paragraphs.join(PARAGRAPH_SEPARATOR)
}

/// Builds the body of every level-1 entry of `toc` found in `scope`.
///
/// Entries whose heading is missing are logged and left out; the caller
/// still gets bodies for every other section.
pub fn extract_sections(scope: Element<'_>, toc: &[TocEntry], converter: &InlineConverter) -> SectionContent {
    toc.iter()
        .filter(|entry| entry.level == 1)
        .filter_map(|entry| match find_heading(scope, &entry.id) {
            Some(heading) => {
                let body = section_body(heading, converter);
                tracing::debug!(id = %entry.id, bytes = body.len(), "correlated section body");
                Some((entry.id.clone(), body))
            }
            None => {
                tracing::warn!(id = %entry.id, title = %entry.title, "no heading matches table of contents entry");
                None
            }
        })
        .collect()
}
